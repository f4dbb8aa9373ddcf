//! `SELECT` binding.

use std::sync::Arc;

use tessera_common::{DbError, DbResult};
use tessera_storage::{Db, Table};
use tracing::{debug, warn};

use super::binder::{BinderContext, ExpressionBinder};
use super::filter::FilterStmt;
use super::join::JoinStmt;
use crate::ast::SelectSqlNode;
use crate::expr::Expression;

/// One bound ORDER BY key.
#[derive(Debug, Clone)]
pub struct OrderByUnit {
    /// Sort key.
    pub expr: Expression,
    /// Descending when true.
    pub desc: bool,
}

/// A bound `SELECT`.
#[derive(Debug, Clone)]
pub struct SelectStmt {
    tables: Vec<Arc<Table>>,
    query_exprs: Vec<Expression>,
    filter: FilterStmt,
    joins: Vec<JoinStmt>,
    group_by: Vec<Expression>,
    order_by: Vec<OrderByUnit>,
}

impl SelectStmt {
    /// Binds a select statement.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for an empty FROM list or select list, a join
    ///   without conditions, or a non-aggregated item missing from GROUP BY
    /// - `SchemaTableNotExist` for an unknown table
    /// - field resolution and coercion errors from the binder
    pub fn create(db: &Db, node: &SelectSqlNode) -> DbResult<Self> {
        if node.relations.is_empty() {
            return Err(DbError::invalid_argument("select without FROM"));
        }
        if node.expressions.is_empty() {
            return Err(DbError::invalid_argument("empty select list"));
        }

        let mut context = BinderContext::new();
        let mut tables = Vec::with_capacity(node.relations.len() + node.joins.len());
        let relations = node
            .relations
            .iter()
            .chain(node.joins.iter().map(|j| &j.relation));
        for name in relations {
            let table = find_table(db, name)?;
            context.add_table(Arc::clone(&table));
            tables.push(table);
        }
        if tables.len() == 1 {
            context.set_default_table(Arc::clone(&tables[0]));
        }

        let binder = ExpressionBinder::new(&context);

        let mut query_exprs = Vec::new();
        for item in &node.expressions {
            binder.bind_expression(item, &mut query_exprs)?;
        }

        let group_by = node
            .group_by
            .iter()
            .map(|item| binder.bind_single(item))
            .collect::<DbResult<Vec<_>>>()?;
        if group_by.iter().any(|e| e.as_field().is_none()) {
            return Err(DbError::invalid_argument("GROUP BY accepts fields only"));
        }

        let order_by = node
            .order_by
            .iter()
            .map(|unit| {
                Ok(OrderByUnit {
                    expr: binder.bind_single(&unit.expr)?,
                    desc: unit.desc,
                })
            })
            .collect::<DbResult<Vec<_>>>()?;

        let filter = FilterStmt::create(&context, &node.conditions)?;

        let mut joins = Vec::with_capacity(node.joins.len());
        for (i, join) in node.joins.iter().enumerate() {
            let visible = node.relations.len() + i + 1;
            let mut join_context = BinderContext::new();
            for table in &tables[..visible] {
                join_context.add_table(Arc::clone(table));
            }
            let table = Arc::clone(&tables[visible - 1]);
            joins.push(JoinStmt::create(&join_context, table, join)?);
        }

        let stmt = Self {
            tables,
            query_exprs,
            filter,
            joins,
            group_by,
            order_by,
        };
        stmt.check_grouping()?;

        debug!(
            tables = stmt.tables.len(),
            exprs = stmt.query_exprs.len(),
            "select bound"
        );
        Ok(stmt)
    }

    /// With aggregation, every plain field in the select list or ORDER BY
    /// must be a GROUP BY key.
    fn check_grouping(&self) -> DbResult<()> {
        if !self.has_aggregation() {
            return Ok(());
        }
        let items = self
            .query_exprs
            .iter()
            .chain(self.order_by.iter().map(|u| &u.expr));
        for expr in items {
            match expr {
                Expression::Aggregate { .. } | Expression::Value(_) => {}
                Expression::Field(f) => {
                    let grouped = self
                        .group_by
                        .iter()
                        .filter_map(Expression::as_field)
                        .any(|g| g.same_field(f));
                    if !grouped {
                        warn!(field = %expr.name(), "field neither aggregated nor grouped");
                        return Err(DbError::invalid_argument(format!(
                            "'{}' must appear in GROUP BY or inside an aggregate",
                            expr.name()
                        )));
                    }
                }
                other => {
                    return Err(DbError::invalid_argument(format!(
                        "'{}' is not allowed with aggregation",
                        other.name()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Returns true if the statement aggregates.
    pub fn has_aggregation(&self) -> bool {
        !self.group_by.is_empty()
            || self.query_exprs.iter().any(Expression::is_aggregate)
            || self.order_by.iter().any(|u| u.expr.is_aggregate())
    }

    /// Distinct aggregates referenced by the select list and ORDER BY.
    pub fn aggregates(&self) -> Vec<Expression> {
        let mut out: Vec<Expression> = Vec::new();
        let items = self
            .query_exprs
            .iter()
            .chain(self.order_by.iter().map(|u| &u.expr));
        for expr in items.filter(|e| e.is_aggregate()) {
            if !out.iter().any(|seen| seen.name() == expr.name()) {
                out.push(expr.clone());
            }
        }
        out
    }

    /// FROM tables followed by joined tables.
    pub fn tables(&self) -> &[Arc<Table>] {
        &self.tables
    }

    /// Number of tables listed in FROM (the rest come from joins).
    pub fn from_count(&self) -> usize {
        self.tables.len() - self.joins.len()
    }

    /// Select list.
    pub fn query_exprs(&self) -> &[Expression] {
        &self.query_exprs
    }

    /// WHERE conditions.
    pub fn filter(&self) -> &FilterStmt {
        &self.filter
    }

    /// JOIN clauses.
    pub fn joins(&self) -> &[JoinStmt] {
        &self.joins
    }

    /// GROUP BY keys.
    pub fn group_by(&self) -> &[Expression] {
        &self.group_by
    }

    /// ORDER BY keys.
    pub fn order_by(&self) -> &[OrderByUnit] {
        &self.order_by
    }
}

pub(crate) fn find_table(db: &Db, name: &str) -> DbResult<Arc<Table>> {
    if name.trim().is_empty() {
        return Err(DbError::invalid_argument("table name is empty"));
    }
    db.find_table(name).ok_or_else(|| {
        warn!(db = db.name(), table = name, "no such table");
        DbError::SchemaTableNotExist {
            table: name.to_string(),
        }
    })
}
