//! INSERT.

use tessera_common::DbResult;
use tessera_txn::Trx;

use crate::operator::{InsertOperator, PhysicalOperator};
use crate::result::SqlResult;
use crate::stmt::InsertStmt;

pub(super) fn execute(stmt: InsertStmt, trx: &mut dyn Trx) -> DbResult<SqlResult> {
    let (table, rows) = stmt.into_parts();
    let mut op = InsertOperator::new(table, rows);
    op.open(trx)?;
    op.close()?;
    Ok(SqlResult::affected(op.inserted()))
}
