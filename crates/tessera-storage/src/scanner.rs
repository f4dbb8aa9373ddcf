//! Record scanners.

use std::sync::Arc;

use tessera_common::DbResult;
use tracing::trace;

use crate::heap::Cursor;
use crate::record::Record;
use crate::table::Table;

/// Access mode of a scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Plain read.
    ReadOnly,
    /// Read with intent to modify. The table refuses mutations until the
    /// scanner is closed.
    ReadWrite,
}

/// Forward scan over the live records of one table.
///
/// A read-write scanner holds the table's write marker until [`close`] is
/// called or the scanner is dropped.
///
/// [`close`]: RecordScanner::close
#[derive(Debug)]
pub struct RecordScanner {
    table: Arc<Table>,
    mode: ScanMode,
    cursor: Cursor,
    closed: bool,
}

impl RecordScanner {
    pub(crate) fn open(table: Arc<Table>, mode: ScanMode) -> Self {
        if mode == ScanMode::ReadWrite {
            table.acquire_scan_marker();
        }
        trace!(table = table.name(), ?mode, "scanner opened");
        Self {
            table,
            mode,
            cursor: Cursor::default(),
            closed: false,
        }
    }

    /// Scan mode.
    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Returns the next live record, or `None` once the table is exhausted.
    /// Keeps returning `None` after that, and after `close`.
    pub fn next_record(&mut self) -> DbResult<Option<Record>> {
        if self.closed {
            return Ok(None);
        }
        match self.table.heap().next_from(self.cursor)? {
            Some((record, next)) => {
                self.cursor = next;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Releases the scanner. Safe to call more than once.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if self.mode == ScanMode::ReadWrite {
            self.table.release_scan_marker();
        }
        trace!(table = self.table.name(), "scanner closed");
    }
}

impl Drop for RecordScanner {
    fn drop(&mut self) {
        self.close();
    }
}
