//! `DROP TABLE` binding.

use tessera_common::{DbError, DbResult};
use tessera_storage::Db;
use tracing::warn;

use crate::ast::DropTableSqlNode;

/// A bound `DROP TABLE`.
#[derive(Debug, Clone)]
pub struct DropTableStmt {
    name: String,
}

impl DropTableStmt {
    /// Binds a drop-table statement.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty name, `SchemaTableNotExist` for an
    /// unknown table.
    pub fn create(db: &Db, node: &DropTableSqlNode) -> DbResult<Self> {
        if node.relation.trim().is_empty() {
            warn!("drop table without a name");
            return Err(DbError::invalid_argument("table name is empty"));
        }
        if db.find_table(&node.relation).is_none() {
            warn!(db = db.name(), table = %node.relation, "no such table");
            return Err(DbError::SchemaTableNotExist {
                table: node.relation.clone(),
            });
        }
        Ok(Self {
            name: node.relation.clone(),
        })
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
