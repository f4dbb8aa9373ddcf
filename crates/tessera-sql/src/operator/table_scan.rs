//! Full table scan.

use std::sync::Arc;

use tessera_common::DbResult;
use tessera_storage::{RecordScanner, ScanMode, Table};
use tessera_txn::Trx;
use tracing::trace;

use super::PhysicalOperator;
use crate::expr::{Tuple, TupleCellSpec};

/// Emits every live record of a table as a tuple.
#[derive(Debug)]
pub struct TableScanOperator {
    table: Arc<Table>,
    specs: Arc<Vec<TupleCellSpec>>,
    scanner: Option<RecordScanner>,
    current: Option<Tuple>,
}

impl TableScanOperator {
    /// Creates a scan over `table`.
    pub fn new(table: Arc<Table>) -> Self {
        let specs = TupleCellSpec::for_table(&table);
        Self {
            table,
            specs,
            scanner: None,
            current: None,
        }
    }
}

impl PhysicalOperator for TableScanOperator {
    fn name(&self) -> &'static str {
        "TableScan"
    }

    fn open(&mut self, _trx: &mut dyn Trx) -> DbResult<()> {
        trace!(table = self.table.name(), "open table scan");
        self.scanner = Some(self.table.get_record_scanner(ScanMode::ReadOnly));
        self.current = None;
        Ok(())
    }

    fn next(&mut self) -> DbResult<bool> {
        let Some(scanner) = self.scanner.as_mut() else {
            self.current = None;
            return Ok(false);
        };
        match scanner.next_record()? {
            Some(record) => {
                let tuple = Tuple::from_record(&self.table, Arc::clone(&self.specs), &record)?;
                self.current = Some(tuple);
                Ok(true)
            }
            None => {
                self.current = None;
                Ok(false)
            }
        }
    }

    fn close(&mut self) -> DbResult<()> {
        if let Some(mut scanner) = self.scanner.take() {
            scanner.close();
        }
        self.current = None;
        Ok(())
    }

    fn current_tuple(&self) -> Option<&Tuple> {
        self.current.as_ref()
    }
}
