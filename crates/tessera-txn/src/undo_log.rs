//! Transaction with an in-memory undo log.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tessera_common::{DbError, DbResult, Rid, TrxId};
use tessera_storage::{Record, RecordBuf, Table};
use tracing::{debug, error};

use crate::trx::Trx;

/// What to do to reverse one applied mutation.
#[derive(Debug)]
enum UndoEntry {
    /// Remove the row that was inserted.
    Inserted { table: Arc<Table>, rid: Rid },
    /// Re-insert the image that was deleted.
    Deleted {
        table: Arc<Table>,
        rid: Rid,
        image: Bytes,
    },
    /// Put the before-image back.
    Updated {
        table: Arc<Table>,
        rid: Rid,
        before: Bytes,
    },
}

/// Records an undo entry per successful mutation and replays the log in
/// reverse on rollback.
///
/// A re-inserted row may land at a different RID than it had before it was
/// deleted; rollback tracks those moves so that older entries still find
/// their row.
#[derive(Debug)]
pub struct UndoLogTrx {
    id: TrxId,
    log: Vec<UndoEntry>,
}

impl UndoLogTrx {
    /// Creates a transaction.
    pub fn new(id: TrxId) -> Self {
        Self {
            id,
            log: Vec::new(),
        }
    }

    /// Number of pending undo entries.
    pub fn pending(&self) -> usize {
        self.log.len()
    }

    fn undo(entry: UndoEntry, moved: &mut HashMap<(usize, Rid), Rid>) -> DbResult<()> {
        let resolve = |table: &Arc<Table>, rid: Rid, moved: &HashMap<(usize, Rid), Rid>| {
            moved
                .get(&(Arc::as_ptr(table) as usize, rid))
                .copied()
                .unwrap_or(rid)
        };

        match entry {
            UndoEntry::Inserted { table, rid } => {
                let current = table.get_record(resolve(&table, rid, moved))?;
                table.delete_record(&current)
            }
            UndoEntry::Deleted { table, rid, image } => {
                let restored = table.insert_record(RecordBuf::from_bytes(&image))?;
                if restored.rid() != rid {
                    moved.insert((Arc::as_ptr(&table) as usize, rid), restored.rid());
                }
                Ok(())
            }
            UndoEntry::Updated { table, rid, before } => {
                let current = table.get_record(resolve(&table, rid, moved))?;
                table
                    .update_record(&current, RecordBuf::from_bytes(&before))
                    .map(|_| ())
            }
        }
    }
}

impl Trx for UndoLogTrx {
    fn id(&self) -> TrxId {
        self.id
    }

    fn insert_record(&mut self, table: &Arc<Table>, buf: RecordBuf) -> DbResult<Record> {
        let record = table.insert_record(buf)?;
        self.log.push(UndoEntry::Inserted {
            table: Arc::clone(table),
            rid: record.rid(),
        });
        Ok(record)
    }

    fn delete_record(&mut self, table: &Arc<Table>, record: &Record) -> DbResult<()> {
        table.delete_record(record)?;
        self.log.push(UndoEntry::Deleted {
            table: Arc::clone(table),
            rid: record.rid(),
            image: Bytes::copy_from_slice(record.data()),
        });
        Ok(())
    }

    fn update_record(
        &mut self,
        table: &Arc<Table>,
        old: &Record,
        new: RecordBuf,
    ) -> DbResult<Record> {
        let record = table.update_record(old, new)?;
        self.log.push(UndoEntry::Updated {
            table: Arc::clone(table),
            rid: old.rid(),
            before: Bytes::copy_from_slice(old.data()),
        });
        Ok(record)
    }

    fn commit(&mut self) -> DbResult<()> {
        debug!(trx = %self.id, entries = self.log.len(), "commit");
        self.log.clear();
        Ok(())
    }

    fn rollback(&mut self) -> DbResult<()> {
        debug!(trx = %self.id, entries = self.log.len(), "rollback");

        let mut moved = HashMap::new();
        let mut first_failure: Option<DbError> = None;
        while let Some(entry) = self.log.pop() {
            if let Err(e) = Self::undo(entry, &mut moved) {
                error!(trx = %self.id, error = %e, "undo step failed");
                first_failure.get_or_insert(e);
            }
        }

        match first_failure {
            Some(e) => Err(DbError::Transaction {
                trx_id: self.id,
                reason: format!("rollback incomplete: {e}"),
            }),
            None => Ok(()),
        }
    }
}
