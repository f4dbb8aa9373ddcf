//! `UPDATE` binding.

use std::sync::Arc;

use tessera_common::{DbError, DbResult};
use tessera_storage::{Db, FieldMeta, Table};
use tessera_types::Value;
use tracing::warn;

use super::binder::BinderContext;
use super::filter::{cast_literal, FilterStmt};
use super::select::find_table;
use crate::ast::UpdateSqlNode;

/// A bound `UPDATE table SET field = value WHERE ...`.
#[derive(Debug, Clone)]
pub struct UpdateStmt {
    table: Arc<Table>,
    field: FieldMeta,
    value: Value,
    filter: FilterStmt,
}

impl UpdateStmt {
    /// Binds an update. The new value is cast to the field's kind.
    ///
    /// A character value longer than the field is accepted; the executor
    /// writes only as many bytes as the field holds.
    pub fn create(db: &Db, node: &UpdateSqlNode) -> DbResult<Self> {
        let table = find_table(db, &node.relation)?;
        if node.attribute.trim().is_empty() {
            return Err(DbError::invalid_argument("update without a target field"));
        }
        let field = table
            .field(&node.attribute)
            .cloned()
            .ok_or_else(|| {
                warn!(table = table.name(), field = %node.attribute, "no such field");
                DbError::SchemaFieldMissing {
                    field: node.attribute.clone(),
                    table: table.name().to_string(),
                }
            })?;

        let value = cast_literal(&node.value, field.kind())?;
        if value.kind().is_character() && value.length() > field.len() {
            warn!(
                field = field.name(),
                width = field.len(),
                length = value.length(),
                "value longer than field, it will be truncated"
            );
        }

        let mut context = BinderContext::new();
        context.add_table(Arc::clone(&table));
        context.set_default_table(Arc::clone(&table));
        let filter = FilterStmt::create(&context, &node.conditions)?;

        Ok(Self {
            table,
            field,
            value,
            filter,
        })
    }

    /// Target table.
    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// Field to set.
    pub fn field(&self) -> &FieldMeta {
        &self.field
    }

    /// New value, already of the field's kind.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// WHERE conditions.
    pub fn filter(&self) -> &FilterStmt {
        &self.filter
    }
}
