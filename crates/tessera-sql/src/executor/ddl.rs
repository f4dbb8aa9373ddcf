//! CREATE TABLE and DROP TABLE.

use tessera_common::DbResult;
use tessera_storage::Db;
use tracing::debug;

use crate::result::SqlResult;
use crate::stmt::{CreateTableStmt, DropTableStmt};

pub(super) fn create_table(stmt: &CreateTableStmt, db: &Db) -> DbResult<SqlResult> {
    let table = db.create_table(stmt.name(), stmt.attrs())?;
    debug!(
        table = table.name(),
        record_size = table.meta().record_size(),
        "table created"
    );
    Ok(SqlResult::success())
}

pub(super) fn drop_table(stmt: &DropTableStmt, db: &Db) -> DbResult<SqlResult> {
    db.drop_table(stmt.name())?;
    Ok(SqlResult::success())
}
