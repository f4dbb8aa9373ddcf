//! Statement executors.
//!
//! [`CommandExecutor::execute`] runs one bound statement against a
//! [`Session`]: SELECT through an operator pipeline, INSERT through the
//! insert operator, UPDATE and DELETE through a two-phase RID loop, and DDL
//! directly against the catalog. Every row mutation goes through the
//! session's transaction.

mod ddl;
mod delete;
mod insert;
mod select;
mod update;

use std::sync::Arc;

use tessera_common::{DbResult, Rid, StatusCode};
use tessera_storage::{RecordScanner, Table};
use tracing::{info, warn};

use crate::expr::{Tuple, TupleCellSpec};
use crate::result::SqlResult;
use crate::session::Session;
use crate::stmt::{FilterStmt, Stmt};

/// Dispatches bound statements to their executors.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandExecutor;

impl CommandExecutor {
    /// Executes `stmt` and stores its result in the session.
    ///
    /// On success the session result carries `Success`, the affected row
    /// count, and for SELECT the header and rows. On failure it carries only
    /// the error code and message, and no mutation of this statement remains
    /// applied.
    pub fn execute(stmt: Stmt, session: &mut Session) -> StatusCode {
        let kind = stmt.kind();
        match Self::run(stmt, session) {
            Ok(result) => {
                info!(
                    statement = kind,
                    rows = result.affected_rows().unwrap_or(0),
                    "statement executed"
                );
                session.set_result(result);
                StatusCode::Success
            }
            Err(e) => {
                warn!(statement = kind, error = %e, "statement failed");
                let code = e.code();
                session.set_result(SqlResult::failure(&e));
                code
            }
        }
    }

    fn run(stmt: Stmt, session: &mut Session) -> DbResult<SqlResult> {
        match stmt {
            Stmt::Select(s) => select::execute(&s, session.trx_mut()),
            Stmt::Insert(s) => insert::execute(s, session.trx_mut()),
            Stmt::Update(s) => update::execute(&s, session.trx_mut()),
            Stmt::Delete(s) => delete::execute(&s, session.trx_mut()),
            Stmt::CreateTable(s) => ddl::create_table(&s, session.db()),
            Stmt::DropTable(s) => ddl::drop_table(&s, session.db()),
        }
    }
}

/// Scans to the end and returns the RIDs of the rows that pass `filter`.
///
/// Only RIDs are kept; callers re-fetch each row before mutating it.
fn collect_rids(
    scanner: &mut RecordScanner,
    table: &Arc<Table>,
    filter: &FilterStmt,
) -> DbResult<Vec<Rid>> {
    let specs = TupleCellSpec::for_table(table);
    let mut rids = Vec::new();
    while let Some(record) = scanner.next_record()? {
        let tuple = Tuple::from_record(table, Arc::clone(&specs), &record)?;
        if filter.matches(&tuple)? {
            rids.push(record.rid());
        }
    }
    Ok(rids)
}
