//! Bound expressions and the tuples they are evaluated against.

mod aggregate;
mod expression;
mod tuple;

pub use aggregate::Accumulator;
pub use expression::{Expression, FieldExpr};
pub use tuple::{Tuple, TupleCellSpec};
