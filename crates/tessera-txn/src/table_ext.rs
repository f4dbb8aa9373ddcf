//! Table helpers that route through a transaction.

use std::sync::Arc;

use tessera_common::DbResult;
use tessera_storage::{Record, RecordBuf, Table};

use crate::trx::Trx;

/// Extension methods on a shared [`Table`] for transactional writes.
pub trait TableTrxExt {
    /// Replaces the row behind `old` with `new` through `trx`.
    fn update_record_with_trx(
        &self,
        trx: &mut dyn Trx,
        old: &Record,
        new: RecordBuf,
    ) -> DbResult<Record>;
}

impl TableTrxExt for Arc<Table> {
    fn update_record_with_trx(
        &self,
        trx: &mut dyn Trx,
        old: &Record,
        new: RecordBuf,
    ) -> DbResult<Record> {
        trx.update_record(self, old, new)
    }
}
