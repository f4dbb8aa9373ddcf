//! Physical operators.
//!
//! Operators form a pull-based tree. Each node is driven through
//! `open` → `next`* → `close`:
//!
//! - `open` opens children and may materialize state eagerly
//! - `next` advances one row and returns `Ok(false)` at end of stream;
//!   further calls keep returning `Ok(false)`
//! - `current_tuple` is valid between a `next` that returned `Ok(true)`
//!   and the following `next` or `close`
//!
//! The transaction is an explicit argument of `open`; operators never look
//! it up from ambient state.

mod aggregate;
mod insert;
mod join;
mod order_by;
mod predicate;
mod project;
mod table_scan;

pub use aggregate::AggregateOperator;
pub use insert::InsertOperator;
pub use join::NestedLoopJoinOperator;
pub use order_by::OrderByOperator;
pub use predicate::PredicateOperator;
pub use project::ProjectOperator;
pub use table_scan::TableScanOperator;

use std::fmt;

use tessera_common::DbResult;
use tessera_txn::Trx;

use crate::expr::Tuple;

/// A node of the physical operator tree.
pub trait PhysicalOperator: fmt::Debug {
    /// Operator name for logs.
    fn name(&self) -> &'static str;

    /// Prepares the operator and its children.
    fn open(&mut self, trx: &mut dyn Trx) -> DbResult<()>;

    /// Advances to the next row. `Ok(false)` means end of stream.
    fn next(&mut self) -> DbResult<bool>;

    /// Releases resources held by the operator and its children.
    fn close(&mut self) -> DbResult<()>;

    /// The row the operator is positioned on.
    fn current_tuple(&self) -> Option<&Tuple>;
}

/// Owned operator tree node.
pub type BoxedOperator = Box<dyn PhysicalOperator>;
