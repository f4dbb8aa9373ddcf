//! SELECT.

use std::sync::Arc;

use tessera_common::DbResult;
use tessera_txn::Trx;
use tessera_types::Value;
use tracing::debug;

use crate::operator::{
    AggregateOperator, BoxedOperator, NestedLoopJoinOperator, OrderByOperator,
    PhysicalOperator, PredicateOperator, ProjectOperator, TableScanOperator,
};
use crate::result::SqlResult;
use crate::stmt::SelectStmt;

/// Builds the operator tree of a bound select:
/// scan → cross joins → ON joins → WHERE → aggregation → ORDER BY → projection.
pub(crate) fn plan(stmt: &SelectStmt) -> ProjectOperator {
    let tables = stmt.tables();
    let mut root: BoxedOperator = Box::new(TableScanOperator::new(Arc::clone(&tables[0])));

    for table in &tables[1..stmt.from_count()] {
        let right = Box::new(TableScanOperator::new(Arc::clone(table)));
        root = Box::new(NestedLoopJoinOperator::new(root, right, None));
    }
    for join in stmt.joins() {
        let right = Box::new(TableScanOperator::new(Arc::clone(join.table())));
        root = Box::new(NestedLoopJoinOperator::new(
            root,
            right,
            join.filter().predicate(),
        ));
    }
    if let Some(predicate) = stmt.filter().predicate() {
        root = Box::new(PredicateOperator::new(root, predicate));
    }
    if stmt.has_aggregation() {
        root = Box::new(AggregateOperator::new(
            root,
            stmt.group_by().to_vec(),
            stmt.aggregates(),
        ));
    }
    if !stmt.order_by().is_empty() {
        root = Box::new(OrderByOperator::new(root, stmt.order_by().to_vec()));
    }
    ProjectOperator::new(root, stmt.query_exprs().to_vec())
}

fn drain(op: &mut dyn PhysicalOperator, trx: &mut dyn Trx) -> DbResult<Vec<Vec<Value>>> {
    op.open(trx)?;
    let mut rows = Vec::new();
    while op.next()? {
        if let Some(tuple) = op.current_tuple() {
            rows.push(tuple.cells().to_vec());
        }
    }
    Ok(rows)
}

pub(super) fn execute(stmt: &SelectStmt, trx: &mut dyn Trx) -> DbResult<SqlResult> {
    let mut project = plan(stmt);
    let header = project.header();
    let drained = drain(&mut project, trx);
    let closed = project.close();
    let rows = drained?;
    closed?;
    debug!(columns = header.len(), rows = rows.len(), "select drained");
    Ok(SqlResult::query(header, rows))
}
