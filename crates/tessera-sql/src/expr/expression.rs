//! Bound expressions.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use tessera_common::{DbError, DbResult};
use tessera_storage::{FieldMeta, Table};
use tessera_types::{AttrType, Value};

use super::tuple::Tuple;
use crate::ast::{AggregateFunc, CompOp};

/// A field resolved against the catalog.
#[derive(Clone)]
pub struct FieldExpr {
    table: Arc<Table>,
    field: FieldMeta,
    qualified: bool,
}

impl FieldExpr {
    /// Creates a field expression. `qualified` controls whether the display
    /// name includes the table.
    pub fn new(table: Arc<Table>, field: FieldMeta, qualified: bool) -> Self {
        Self {
            table,
            field,
            qualified,
        }
    }

    /// Owning table.
    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// Field metadata.
    pub fn field(&self) -> &FieldMeta {
        &self.field
    }

    /// Returns true when both refer to the same field of the same table.
    pub fn same_field(&self, other: &FieldExpr) -> bool {
        Arc::ptr_eq(&self.table, &other.table) && self.field.name() == other.field.name()
    }
}

impl fmt::Debug for FieldExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field({}.{})", self.table.name(), self.field.name())
    }
}

/// An expression bound against the catalog.
#[derive(Debug, Clone)]
pub enum Expression {
    /// Field of a table.
    Field(FieldExpr),
    /// Literal.
    Value(Value),
    /// Cast of a child to another kind.
    Cast {
        /// Input.
        child: Box<Expression>,
        /// Target kind.
        target: AttrType,
    },
    /// `left op right`, yielding a boolean.
    Comparison {
        /// Operator.
        op: CompOp,
        /// Left side.
        left: Box<Expression>,
        /// Right side.
        right: Box<Expression>,
    },
    /// AND of booleans. An empty conjunction is true.
    Conjunction(Vec<Expression>),
    /// Aggregate. `child` is `None` for `COUNT(*)`.
    Aggregate {
        /// Function.
        func: AggregateFunc,
        /// Argument.
        child: Option<Box<Expression>>,
    },
}

impl Expression {
    /// Evaluates against a tuple.
    ///
    /// Aggregates read their precomputed result cell by name.
    pub fn get_value(&self, tuple: &Tuple) -> DbResult<Value> {
        match self {
            Expression::Field(f) => tuple
                .find_cell(f.table.name(), f.field.name())
                .cloned()
                .ok_or_else(|| {
                    DbError::internal(format!(
                        "tuple has no cell for {}.{}",
                        f.table.name(),
                        f.field.name()
                    ))
                }),
            Expression::Value(v) => Ok(v.clone()),
            Expression::Cast { child, target } => child.get_value(tuple)?.cast_to(*target),
            Expression::Comparison { op, left, right } => {
                let l = left.get_value(tuple)?;
                let r = right.get_value(tuple)?;
                let ordering = l.compare(&r)?;
                Ok(Value::from_bool(matches(*op, ordering)))
            }
            Expression::Conjunction(children) => {
                for child in children {
                    let value = child.get_value(tuple)?;
                    let holds = value
                        .as_bool()
                        .ok_or_else(|| DbError::type_mismatch(AttrType::Booleans, value.kind()))?;
                    if !holds {
                        return Ok(Value::from_bool(false));
                    }
                }
                Ok(Value::from_bool(true))
            }
            Expression::Aggregate { .. } => {
                let name = self.name();
                tuple.find_cell("", &name).cloned().ok_or_else(|| {
                    DbError::internal(format!("aggregate {name} evaluated before aggregation"))
                })
            }
        }
    }

    /// Evaluates as a predicate.
    pub fn test(&self, tuple: &Tuple) -> DbResult<bool> {
        let value = self.get_value(tuple)?;
        value.as_bool().ok_or_else(|| {
            DbError::internal(format!("predicate yielded {} instead of a boolean", value.kind()))
        })
    }

    /// Kind of the value this expression yields.
    pub fn value_type(&self) -> AttrType {
        match self {
            Expression::Field(f) => f.field.kind(),
            Expression::Value(v) => v.kind(),
            Expression::Cast { target, .. } => *target,
            Expression::Comparison { .. } | Expression::Conjunction(_) => AttrType::Booleans,
            Expression::Aggregate { func, child } => match (func, child) {
                (AggregateFunc::Count, _) | (_, None) => AttrType::Ints,
                (AggregateFunc::Avg, _) => AttrType::Floats,
                (_, Some(child)) => child.value_type(),
            },
        }
    }

    /// Display name, used for result headers and computed cells.
    pub fn name(&self) -> String {
        match self {
            Expression::Field(f) if f.qualified => {
                format!("{}.{}", f.table.name(), f.field.name())
            }
            Expression::Field(f) => f.field.name().to_string(),
            Expression::Value(v) => v.to_string(),
            Expression::Cast { child, .. } => child.name(),
            Expression::Comparison { op, left, right } => {
                format!("{} {op} {}", left.name(), right.name())
            }
            Expression::Conjunction(children) => children
                .iter()
                .map(Expression::name)
                .collect::<Vec<_>>()
                .join(" AND "),
            Expression::Aggregate { func, child } => match child {
                Some(child) => format!("{func}({})", child.name()),
                None => format!("{func}(*)"),
            },
        }
    }

    /// Returns true for an aggregate.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Expression::Aggregate { .. })
    }

    /// The field behind this expression, if it is one.
    pub fn as_field(&self) -> Option<&FieldExpr> {
        match self {
            Expression::Field(f) => Some(f),
            _ => None,
        }
    }
}

fn matches(op: CompOp, ordering: Ordering) -> bool {
    match op {
        CompOp::Eq => ordering == Ordering::Equal,
        CompOp::Ne => ordering != Ordering::Equal,
        CompOp::Lt => ordering == Ordering::Less,
        CompOp::Le => ordering != Ordering::Greater,
        CompOp::Gt => ordering == Ordering::Greater,
        CompOp::Ge => ordering != Ordering::Less,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::TupleCellSpec;

    fn tuple() -> Tuple {
        Tuple::new(
            Arc::new(vec![
                TupleCellSpec::new("t", "id"),
                TupleCellSpec::computed("COUNT(*)"),
            ]),
            vec![Value::from_int(3), Value::from_int(10)],
        )
    }

    fn cmp(op: CompOp, l: Value, r: Value) -> Expression {
        Expression::Comparison {
            op,
            left: Box::new(Expression::Value(l)),
            right: Box::new(Expression::Value(r)),
        }
    }

    #[test]
    fn test_comparison_ops() {
        let t = tuple();
        let two = || Value::from_int(2);
        let three = || Value::from_int(3);
        assert!(cmp(CompOp::Lt, two(), three()).test(&t).unwrap());
        assert!(cmp(CompOp::Le, three(), three()).test(&t).unwrap());
        assert!(!cmp(CompOp::Gt, two(), three()).test(&t).unwrap());
        assert!(cmp(CompOp::Ne, two(), three()).test(&t).unwrap());
        assert!(cmp(CompOp::Ge, Value::from_float(3.5), three()).test(&t).unwrap());
    }

    #[test]
    fn test_conjunction() {
        let t = tuple();
        let yes = cmp(CompOp::Eq, Value::from_int(1), Value::from_int(1));
        let no = cmp(CompOp::Eq, Value::from_int(1), Value::from_int(2));
        assert!(Expression::Conjunction(vec![]).test(&t).unwrap());
        assert!(Expression::Conjunction(vec![yes.clone(), yes.clone()]).test(&t).unwrap());
        assert!(!Expression::Conjunction(vec![yes, no]).test(&t).unwrap());
    }

    #[test]
    fn test_conjunction_rejects_non_boolean_child() {
        let t = tuple();
        let yes = cmp(CompOp::Eq, Value::from_int(1), Value::from_int(1));
        let conj = Expression::Conjunction(vec![yes, Expression::Value(Value::from_int(0))]);
        let err = conj.test(&t).unwrap_err();
        assert!(matches!(err, DbError::SchemaFieldTypeMismatch { .. }));
    }

    #[test]
    fn test_incomparable_is_error() {
        let e = cmp(CompOp::Eq, Value::from_int(1), Value::from("1"));
        assert!(e.test(&tuple()).is_err());
    }

    #[test]
    fn test_aggregate_reads_result_cell() {
        let e = Expression::Aggregate {
            func: AggregateFunc::Count,
            child: None,
        };
        assert_eq!(e.name(), "COUNT(*)");
        assert_eq!(e.value_type(), AttrType::Ints);
        assert_eq!(e.get_value(&tuple()).unwrap(), Value::from_int(10));
    }

    #[test]
    fn test_cast() {
        let e = Expression::Cast {
            child: Box::new(Expression::Value(Value::from("2024-02-29"))),
            target: AttrType::Dates,
        };
        assert_eq!(e.get_value(&tuple()).unwrap(), Value::from_date(20240229));
    }
}
