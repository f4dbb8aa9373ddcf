//! JOIN clauses.

use std::sync::Arc;

use tessera_common::{DbError, DbResult};
use tessera_storage::Table;
use tracing::warn;

use super::binder::BinderContext;
use super::filter::FilterStmt;
use crate::ast::JoinSqlNode;

/// A bound `JOIN table ON ...`.
#[derive(Debug, Clone)]
pub struct JoinStmt {
    table: Arc<Table>,
    filter: FilterStmt,
}

impl JoinStmt {
    /// Binds a join clause.
    ///
    /// `context` must contain the tables joined so far plus `table`, so the
    /// ON conditions can only see tables already present in the joined row.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty ON list, plus any condition binding
    /// error.
    pub fn create(context: &BinderContext, table: Arc<Table>, node: &JoinSqlNode) -> DbResult<Self> {
        if node.conditions.is_empty() {
            warn!(table = %node.relation, "join without conditions");
            return Err(DbError::invalid_argument(format!(
                "join with '{}' has no ON conditions",
                node.relation
            )));
        }
        let filter = FilterStmt::create(context, &node.conditions)?;
        Ok(Self { table, filter })
    }

    /// Joined table.
    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// ON conditions.
    pub fn filter(&self) -> &FilterStmt {
        &self.filter
    }
}
