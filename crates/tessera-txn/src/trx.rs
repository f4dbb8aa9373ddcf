//! The transaction collaborator interface.

use std::fmt;
use std::sync::Arc;

use tessera_common::{DbResult, TrxId};
use tessera_storage::{Record, RecordBuf, Table};

/// A transaction that row mutations are routed through.
///
/// Each call is atomic for one row. Grouping calls into an all-or-nothing
/// unit is up to the caller, either by undoing its own steps or by calling
/// [`Trx::rollback`].
pub trait Trx: fmt::Debug + Send {
    /// Transaction id.
    fn id(&self) -> TrxId;

    /// Stores a new row.
    fn insert_record(&mut self, table: &Arc<Table>, buf: RecordBuf) -> DbResult<Record>;

    /// Removes a row. `record` must be the row's current snapshot.
    fn delete_record(&mut self, table: &Arc<Table>, record: &Record) -> DbResult<()>;

    /// Replaces a row. `old` must be the row's current snapshot.
    fn update_record(
        &mut self,
        table: &Arc<Table>,
        old: &Record,
        new: RecordBuf,
    ) -> DbResult<Record>;

    /// Makes every mutation since the last commit or rollback permanent.
    fn commit(&mut self) -> DbResult<()>;

    /// Undoes every mutation since the last commit or rollback, if the
    /// implementation can.
    fn rollback(&mut self) -> DbResult<()>;
}
