//! In-memory slotted heap.
//!
//! Rows live in fixed-capacity pages of slots. A slot keeps a generation
//! counter that advances on every write, which is how stale [`Record`]
//! snapshots are detected. Freed slots are reused by later inserts.

use bytes::Bytes;
use parking_lot::RwLock;
use tessera_common::{DbError, DbResult, PageId, Rid, SlotId};
use tracing::trace;

use crate::record::Record;

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    data: Option<Bytes>,
}

#[derive(Debug, Default)]
struct Page {
    slots: Vec<Slot>,
    live: usize,
}

/// Position of the next slot a scan will inspect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Cursor {
    page: usize,
    slot: usize,
}

/// Slotted heap holding fixed-width records.
#[derive(Debug)]
pub struct Heap {
    record_size: usize,
    records_per_page: usize,
    pages: RwLock<Vec<Page>>,
}

impl Heap {
    /// Creates an empty heap.
    pub fn new(record_size: usize, records_per_page: usize) -> Self {
        Self {
            record_size,
            records_per_page: records_per_page.clamp(1, usize::from(SlotId::MAX)),
            pages: RwLock::new(Vec::new()),
        }
    }

    /// Width of every record in bytes.
    pub fn record_size(&self) -> usize {
        self.record_size
    }

    /// Slots per page.
    pub fn records_per_page(&self) -> usize {
        self.records_per_page
    }

    /// Number of allocated pages.
    pub fn page_count(&self) -> usize {
        self.pages.read().len()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.pages.read().iter().map(|p| p.live).sum()
    }

    /// Returns true when no record is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores a record in the first free slot.
    pub fn insert(&self, data: Bytes) -> DbResult<Record> {
        self.check_size(data.len())?;

        let mut pages = self.pages.write();
        let page_idx = match pages.iter().position(|p| p.live < self.records_per_page) {
            Some(idx) => idx,
            None => {
                pages.push(Page::default());
                pages.len() - 1
            }
        };

        let page = &mut pages[page_idx];
        let slot_idx = match page.slots.iter().position(|s| s.data.is_none()) {
            Some(idx) => idx,
            None => {
                page.slots.push(Slot::default());
                page.slots.len() - 1
            }
        };

        let rid = make_rid(page_idx, slot_idx)?;
        let slot = &mut page.slots[slot_idx];
        slot.generation += 1;
        slot.data = Some(data.clone());
        page.live += 1;

        trace!(%rid, generation = slot.generation, "heap insert");
        Ok(Record::new(rid, slot.generation, data))
    }

    /// Fetches the current image of a row.
    pub fn get(&self, rid: Rid) -> DbResult<Record> {
        let pages = self.pages.read();
        let slot = locate(&pages, rid).ok_or(DbError::RecordNotFound { rid })?;
        match &slot.data {
            Some(data) => Ok(Record::new(rid, slot.generation, data.clone())),
            None => Err(DbError::RecordNotFound { rid }),
        }
    }

    /// Replaces a row, provided `old` is still its current snapshot.
    pub fn update(&self, old: &Record, data: Bytes) -> DbResult<Record> {
        self.check_size(data.len())?;

        let rid = old.rid();
        let mut pages = self.pages.write();
        let slot = live_slot_mut(&mut pages, old)?;
        slot.generation += 1;
        slot.data = Some(data.clone());
        trace!(%rid, generation = slot.generation, "heap update");
        Ok(Record::new(rid, slot.generation, data))
    }

    /// Frees a row, provided `old` is still its current snapshot.
    pub fn delete(&self, old: &Record) -> DbResult<()> {
        let rid = old.rid();
        let mut pages = self.pages.write();
        let slot = live_slot_mut(&mut pages, old)?;
        slot.generation += 1;
        slot.data = None;
        pages[rid.page_id.as_u64() as usize].live -= 1;
        trace!(%rid, "heap delete");
        Ok(())
    }

    /// Returns the first live record at or after `cursor`, and the cursor
    /// just past it.
    pub(crate) fn next_from(&self, cursor: Cursor) -> DbResult<Option<(Record, Cursor)>> {
        let pages = self.pages.read();
        let mut pos = cursor;
        while pos.page < pages.len() {
            let page = &pages[pos.page];
            while pos.slot < page.slots.len() {
                let slot = &page.slots[pos.slot];
                if let Some(data) = &slot.data {
                    let rid = make_rid(pos.page, pos.slot)?;
                    let record = Record::new(rid, slot.generation, data.clone());
                    let next = Cursor {
                        page: pos.page,
                        slot: pos.slot + 1,
                    };
                    return Ok(Some((record, next)));
                }
                pos.slot += 1;
            }
            pos = Cursor {
                page: pos.page + 1,
                slot: 0,
            };
        }
        Ok(None)
    }

    fn check_size(&self, len: usize) -> DbResult<()> {
        if len != self.record_size {
            return Err(DbError::internal(format!(
                "record of {len} bytes does not match table width {}",
                self.record_size
            )));
        }
        Ok(())
    }
}

fn make_rid(page: usize, slot: usize) -> DbResult<Rid> {
    let slot = SlotId::try_from(slot)
        .map_err(|_| DbError::storage(format!("slot index {slot} out of range")))?;
    Ok(Rid::new(PageId::new(page as u64), slot))
}

fn locate(pages: &[Page], rid: Rid) -> Option<&Slot> {
    pages
        .get(usize::try_from(rid.page_id.as_u64()).ok()?)?
        .slots
        .get(usize::from(rid.slot_id))
}

fn live_slot_mut<'a>(pages: &'a mut [Page], old: &Record) -> DbResult<&'a mut Slot> {
    let rid = old.rid();
    let slot = usize::try_from(rid.page_id.as_u64())
        .ok()
        .and_then(|p| pages.get_mut(p))
        .and_then(|p| p.slots.get_mut(usize::from(rid.slot_id)))
        .ok_or(DbError::RecordNotFound { rid })?;

    if slot.data.is_none() {
        return Err(DbError::RecordNotFound { rid });
    }
    if slot.generation != old.generation() {
        return Err(DbError::RecordStale { rid });
    }
    Ok(slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_common::StatusCode;

    fn row(b: u8) -> Bytes {
        Bytes::from(vec![b; 4])
    }

    #[test]
    fn test_insert_get() {
        let heap = Heap::new(4, 2);
        let a = heap.insert(row(1)).unwrap();
        let b = heap.insert(row(2)).unwrap();
        let c = heap.insert(row(3)).unwrap();

        assert_eq!(a.rid(), Rid::new(PageId::new(0), 0));
        assert_eq!(b.rid(), Rid::new(PageId::new(0), 1));
        assert_eq!(c.rid(), Rid::new(PageId::new(1), 0));
        assert_eq!(heap.get(b.rid()).unwrap().data(), &[2; 4]);
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.page_count(), 2);
    }

    #[test]
    fn test_stale_snapshot_rejected() {
        let heap = Heap::new(4, 8);
        let first = heap.insert(row(1)).unwrap();
        let second = heap.update(&first, row(2)).unwrap();

        let err = heap.update(&first, row(3)).unwrap_err();
        assert_eq!(err.code(), StatusCode::RecordStale);
        assert_eq!(heap.delete(&first).unwrap_err().code(), StatusCode::RecordStale);

        heap.delete(&second).unwrap();
        assert_eq!(
            heap.get(second.rid()).unwrap_err().code(),
            StatusCode::RecordNotFound
        );
    }

    #[test]
    fn test_slot_reuse_bumps_generation() {
        let heap = Heap::new(4, 8);
        let first = heap.insert(row(1)).unwrap();
        heap.delete(&first).unwrap();
        let reused = heap.insert(row(9)).unwrap();

        assert_eq!(reused.rid(), first.rid());
        assert!(reused.generation() > first.generation());
        assert_eq!(heap.update(&first, row(0)).unwrap_err().code(), StatusCode::RecordStale);
    }

    #[test]
    fn test_wrong_width() {
        let heap = Heap::new(4, 8);
        assert!(heap.insert(Bytes::from_static(b"abc")).is_err());
    }

    #[test]
    fn test_next_from_skips_holes() {
        let heap = Heap::new(4, 2);
        let recs: Vec<_> = (0..5).map(|i| heap.insert(row(i)).unwrap()).collect();
        heap.delete(&recs[1]).unwrap();
        heap.delete(&recs[2]).unwrap();

        let mut seen = Vec::new();
        let mut cursor = Cursor::default();
        while let Some((record, next)) = heap.next_from(cursor).unwrap() {
            seen.push(record.data()[0]);
            cursor = next;
        }
        assert_eq!(seen, vec![0, 3, 4]);
    }
}
