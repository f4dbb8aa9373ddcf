//! Transaction factory.

use std::sync::atomic::{AtomicU64, Ordering};

use tessera_common::config::TrxKind;
use tessera_common::TrxId;
use tracing::debug;

use crate::trx::Trx;
use crate::undo_log::UndoLogTrx;
use crate::vacuous::VacuousTrx;

/// Builds transactions and assigns their ids.
#[derive(Debug)]
pub struct TrxKit {
    next_id: AtomicU64,
}

impl TrxKit {
    /// Creates a kit whose first transaction gets id 1.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
        }
    }

    /// Builds a transaction of the given kind.
    pub fn create(&self, kind: TrxKind) -> Box<dyn Trx> {
        let id = TrxId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!(trx = %id, %kind, "transaction created");
        match kind {
            TrxKind::Vacuous => Box::new(VacuousTrx::new(id)),
            TrxKind::UndoLog => Box::new(UndoLogTrx::new(id)),
        }
    }
}

impl Default for TrxKit {
    fn default() -> Self {
        Self::new()
    }
}
