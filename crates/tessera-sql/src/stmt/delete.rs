//! `DELETE` binding.

use std::sync::Arc;

use tessera_common::DbResult;
use tessera_storage::{Db, Table};

use super::binder::BinderContext;
use super::filter::FilterStmt;
use super::select::find_table;
use crate::ast::DeleteSqlNode;

/// A bound `DELETE FROM table WHERE ...`.
#[derive(Debug, Clone)]
pub struct DeleteStmt {
    table: Arc<Table>,
    filter: FilterStmt,
}

impl DeleteStmt {
    /// Binds a delete.
    pub fn create(db: &Db, node: &DeleteSqlNode) -> DbResult<Self> {
        let table = find_table(db, &node.relation)?;
        let mut context = BinderContext::new();
        context.add_table(Arc::clone(&table));
        context.set_default_table(Arc::clone(&table));
        let filter = FilterStmt::create(&context, &node.conditions)?;
        Ok(Self { table, filter })
    }

    /// Target table.
    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// WHERE conditions.
    pub fn filter(&self) -> &FilterStmt {
        &self.filter
    }
}
