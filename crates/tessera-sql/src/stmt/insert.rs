//! `INSERT` binding.

use std::sync::Arc;

use tessera_common::{DbError, DbResult};
use tessera_storage::{Db, Table};
use tessera_types::Value;

use super::select::find_table;
use crate::ast::InsertSqlNode;

/// A bound `INSERT`. Rows are encoded, and cast to the field kinds, when
/// the statement runs.
#[derive(Debug, Clone)]
pub struct InsertStmt {
    table: Arc<Table>,
    rows: Vec<Vec<Value>>,
}

impl InsertStmt {
    /// Binds an insert.
    pub fn create(db: &Db, node: &InsertSqlNode) -> DbResult<Self> {
        let table = find_table(db, &node.relation)?;
        if node.rows.is_empty() {
            return Err(DbError::invalid_argument("insert without rows"));
        }
        Ok(Self {
            table,
            rows: node.rows.clone(),
        })
    }

    /// Target table.
    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// Rows to insert.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Splits into table and rows.
    pub fn into_parts(self) -> (Arc<Table>, Vec<Vec<Value>>) {
        (self.table, self.rows)
    }
}
