//! Transaction that applies mutations directly.

use std::sync::Arc;

use tessera_common::{DbResult, TrxId};
use tessera_storage::{Record, RecordBuf, Table};
use tracing::warn;

use crate::trx::Trx;

/// Applies every mutation immediately and keeps no undo information.
///
/// `rollback` succeeds but changes nothing; callers that need statement
/// atomicity must undo their own steps.
#[derive(Debug)]
pub struct VacuousTrx {
    id: TrxId,
    mutations: usize,
}

impl VacuousTrx {
    /// Creates a transaction.
    pub fn new(id: TrxId) -> Self {
        Self { id, mutations: 0 }
    }
}

impl Trx for VacuousTrx {
    fn id(&self) -> TrxId {
        self.id
    }

    fn insert_record(&mut self, table: &Arc<Table>, buf: RecordBuf) -> DbResult<Record> {
        let record = table.insert_record(buf)?;
        self.mutations += 1;
        Ok(record)
    }

    fn delete_record(&mut self, table: &Arc<Table>, record: &Record) -> DbResult<()> {
        table.delete_record(record)?;
        self.mutations += 1;
        Ok(())
    }

    fn update_record(
        &mut self,
        table: &Arc<Table>,
        old: &Record,
        new: RecordBuf,
    ) -> DbResult<Record> {
        let record = table.update_record(old, new)?;
        self.mutations += 1;
        Ok(record)
    }

    fn commit(&mut self) -> DbResult<()> {
        self.mutations = 0;
        Ok(())
    }

    fn rollback(&mut self) -> DbResult<()> {
        if self.mutations > 0 {
            warn!(
                trx = %self.id,
                mutations = self.mutations,
                "vacuous transaction cannot undo applied mutations"
            );
        }
        self.mutations = 0;
        Ok(())
    }
}
