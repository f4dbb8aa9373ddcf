//! Sessions: one transaction and one result slot over a shared database.

use std::sync::Arc;

use tessera_common::{DbResult, StatusCode, TrxId};
use tessera_storage::Db;
use tessera_txn::{Trx, TrxKit};
use tracing::{debug, error, warn};

use crate::ast::SqlNode;
use crate::executor::CommandExecutor;
use crate::result::SqlResult;
use crate::stmt::Stmt;

/// A client session.
///
/// The session owns its transaction and passes it explicitly to every
/// executor. In autocommit mode each statement is its own transaction:
/// success commits and failure rolls back.
#[derive(Debug)]
pub struct Session {
    db: Arc<Db>,
    trx: Box<dyn Trx>,
    autocommit: bool,
    result: SqlResult,
    statement_count: u64,
}

impl Session {
    /// Creates a session with the transaction kind configured on `db`.
    pub fn new(db: Arc<Db>) -> Self {
        let trx = TrxKit::new().create(db.config().trx_kind);
        Self::with_trx(db, trx)
    }

    /// Creates a session over a caller-supplied transaction.
    pub fn with_trx(db: Arc<Db>, trx: Box<dyn Trx>) -> Self {
        let autocommit = db.config().autocommit;
        Self {
            db,
            trx,
            autocommit,
            result: SqlResult::default(),
            statement_count: 0,
        }
    }

    /// The database.
    pub fn db(&self) -> &Arc<Db> {
        &self.db
    }

    /// The session transaction.
    pub fn trx_mut(&mut self) -> &mut dyn Trx {
        self.trx.as_mut()
    }

    /// Id of the session transaction.
    #[inline]
    #[must_use]
    pub fn trx_id(&self) -> TrxId {
        self.trx.id()
    }

    /// Returns true when each statement commits on its own.
    #[inline]
    #[must_use]
    pub fn autocommit(&self) -> bool {
        self.autocommit
    }

    /// Enables or disables autocommit.
    pub fn set_autocommit(&mut self, enabled: bool) {
        self.autocommit = enabled;
    }

    /// Result of the last statement.
    pub fn result(&self) -> &SqlResult {
        &self.result
    }

    pub(crate) fn set_result(&mut self, result: SqlResult) {
        self.result = result;
    }

    /// Statements executed so far.
    #[inline]
    #[must_use]
    pub fn statement_count(&self) -> u64 {
        self.statement_count
    }

    // =========================================================================
    // Transaction Control
    // =========================================================================

    /// Commits the session transaction.
    pub fn commit(&mut self) -> DbResult<()> {
        debug!(trx = %self.trx.id(), "commit");
        self.trx.commit()
    }

    /// Rolls back the session transaction.
    pub fn rollback(&mut self) -> DbResult<()> {
        debug!(trx = %self.trx.id(), "rollback");
        self.trx.rollback()
    }

    // =========================================================================
    // Statement Execution
    // =========================================================================

    /// Binds and executes one raw statement. The outcome is also stored in
    /// [`Session::result`].
    pub fn execute_node(&mut self, node: &SqlNode) -> StatusCode {
        self.statement_count += 1;

        let status = match Stmt::create(&self.db, node) {
            Ok(stmt) => CommandExecutor::execute(stmt, self),
            Err(e) => {
                warn!(error = %e, "statement rejected");
                let code = e.code();
                self.result = SqlResult::failure(&e);
                code
            }
        };

        if !self.autocommit {
            return status;
        }
        if status.is_success() {
            if let Err(e) = self.commit() {
                warn!(error = %e, "commit failed");
                let code = e.code();
                self.result = SqlResult::failure(&e);
                if let Err(undo) = self.rollback() {
                    error!(error = %undo, "rollback after failed commit failed");
                }
                return code;
            }
        } else if let Err(e) = self.rollback() {
            error!(error = %e, primary = %status, "rollback of failed statement failed");
        }
        status
    }
}
