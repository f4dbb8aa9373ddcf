//! Batch insert.

use std::sync::Arc;

use tessera_common::DbResult;
use tessera_storage::{Record, Table};
use tessera_txn::Trx;
use tessera_types::Value;
use tracing::{debug, error};

use super::PhysicalOperator;
use crate::expr::Tuple;

/// Inserts a batch of rows through the transaction at `open`.
///
/// The batch is all-or-nothing: when row `k` fails, the rows inserted
/// before it are deleted again and the error of row `k` is returned.
#[derive(Debug)]
pub struct InsertOperator {
    table: Arc<Table>,
    rows: Vec<Vec<Value>>,
    inserted: usize,
}

impl InsertOperator {
    /// Creates an insert of `rows` into `table`.
    pub fn new(table: Arc<Table>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            table,
            rows,
            inserted: 0,
        }
    }

    /// Rows inserted by the last successful `open`.
    #[inline]
    #[must_use]
    pub fn inserted(&self) -> usize {
        self.inserted
    }

    fn insert_one(&self, trx: &mut dyn Trx, row: &[Value]) -> DbResult<Record> {
        let buf = self.table.make_record(row)?;
        trx.insert_record(&self.table, buf)
    }

    fn undo(&self, trx: &mut dyn Trx, done: &[Record]) {
        for record in done.iter().rev() {
            if let Err(e) = trx.delete_record(&self.table, record) {
                error!(
                    table = self.table.name(),
                    rid = %record.rid(),
                    error = %e,
                    "failed to remove a row of a failed insert batch"
                );
            }
        }
    }
}

impl PhysicalOperator for InsertOperator {
    fn name(&self) -> &'static str {
        "Insert"
    }

    fn open(&mut self, trx: &mut dyn Trx) -> DbResult<()> {
        self.inserted = 0;
        let mut done = Vec::with_capacity(self.rows.len());
        for (i, row) in self.rows.iter().enumerate() {
            match self.insert_one(trx, row) {
                Ok(record) => done.push(record),
                Err(e) => {
                    debug!(table = self.table.name(), row = i, error = %e, "insert failed");
                    self.undo(trx, &done);
                    return Err(e);
                }
            }
        }
        self.inserted = done.len();
        Ok(())
    }

    fn next(&mut self) -> DbResult<bool> {
        Ok(false)
    }

    fn close(&mut self) -> DbResult<()> {
        Ok(())
    }

    fn current_tuple(&self) -> Option<&Tuple> {
        None
    }
}
