//! `CREATE TABLE` binding.

use tessera_common::{DbError, DbResult};
use tessera_storage::{AttrInfo, Db};
use tracing::warn;

use crate::ast::CreateTableSqlNode;

/// A bound `CREATE TABLE`.
#[derive(Debug, Clone)]
pub struct CreateTableStmt {
    name: String,
    attrs: Vec<AttrInfo>,
}

impl CreateTableStmt {
    /// Binds a create-table statement. Column layout is validated when the
    /// catalog creates the table.
    pub fn create(db: &Db, node: &CreateTableSqlNode) -> DbResult<Self> {
        if node.relation.trim().is_empty() {
            return Err(DbError::invalid_argument("table name is empty"));
        }
        if node.attrs.is_empty() {
            return Err(DbError::invalid_argument(format!(
                "table '{}' has no fields",
                node.relation
            )));
        }
        if db.find_table(&node.relation).is_some() {
            warn!(table = %node.relation, "table already exists");
            return Err(DbError::SchemaTableExist {
                table: node.relation.clone(),
            });
        }
        Ok(Self {
            name: node.relation.clone(),
            attrs: node.attrs.clone(),
        })
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column definitions.
    pub fn attrs(&self) -> &[AttrInfo] {
        &self.attrs
    }
}
