//! WHERE and ON conditions.

use tessera_common::{DbError, DbResult, CAST_FORBIDDEN};
use tessera_types::{cast_cost, AttrType, Value};
use tracing::warn;

use super::binder::BinderContext;
use crate::ast::{ConditionOperand, ConditionSqlNode};
use crate::expr::{Expression, Tuple};

/// Bound conditions, AND-ed together.
#[derive(Debug, Clone)]
pub struct FilterStmt {
    conditions: Vec<Expression>,
}

impl FilterStmt {
    /// Binds a condition list.
    ///
    /// Operands whose kinds cannot be compared directly are coerced: a
    /// literal is cast to the kind of the field it is compared with, and of
    /// two fields the side with the cheaper cast is wrapped in a cast.
    ///
    /// # Errors
    ///
    /// Name resolution errors from [`BinderContext::resolve_field`];
    /// `SchemaFieldTypeMismatch` when no cast connects the two kinds;
    /// `InvalidArgument` for a literal that does not parse as the field kind.
    pub fn create(context: &BinderContext, conditions: &[ConditionSqlNode]) -> DbResult<Self> {
        let conditions = conditions
            .iter()
            .map(|c| bind_condition(context, c))
            .collect::<DbResult<Vec<_>>>()?;
        Ok(Self { conditions })
    }

    /// Returns true when there are no conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Bound conditions.
    pub fn conditions(&self) -> &[Expression] {
        &self.conditions
    }

    /// The conditions as one predicate, or `None` when empty.
    pub fn predicate(&self) -> Option<Expression> {
        match self.conditions.len() {
            0 => None,
            1 => Some(self.conditions[0].clone()),
            _ => Some(Expression::Conjunction(self.conditions.clone())),
        }
    }

    /// Evaluates the conditions against a tuple.
    pub fn matches(&self, tuple: &Tuple) -> DbResult<bool> {
        for condition in &self.conditions {
            if !condition.test(tuple)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn bind_condition(context: &BinderContext, node: &ConditionSqlNode) -> DbResult<Expression> {
    let left = bind_operand(context, &node.left)?;
    let right = bind_operand(context, &node.right)?;
    let (left, right) = coerce(left, right)?;
    Ok(Expression::Comparison {
        op: node.op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn bind_operand(context: &BinderContext, operand: &ConditionOperand) -> DbResult<Expression> {
    match operand {
        ConditionOperand::Field(rel) => Ok(Expression::Field(context.resolve_field(rel)?)),
        ConditionOperand::Value(v) => Ok(Expression::Value(v.clone())),
    }
}

/// Kinds the comparators accept without a cast.
fn comparable(a: AttrType, b: AttrType) -> bool {
    a == b || (a.is_character() && b.is_character()) || (a.is_numeric() && b.is_numeric())
}

fn coerce(left: Expression, right: Expression) -> DbResult<(Expression, Expression)> {
    let (lk, rk) = (left.value_type(), right.value_type());
    if comparable(lk, rk) {
        return Ok((left, right));
    }

    match (left, right) {
        (Expression::Value(v), right @ Expression::Field(_)) => {
            Ok((Expression::Value(cast_literal(&v, rk)?), right))
        }
        (left @ Expression::Field(_), Expression::Value(v)) => {
            Ok((left, Expression::Value(cast_literal(&v, lk)?)))
        }
        (left, right) => {
            let to_right = cast_cost(lk, rk);
            let to_left = cast_cost(rk, lk);
            if to_right == CAST_FORBIDDEN && to_left == CAST_FORBIDDEN {
                warn!(left = %lk, right = %rk, "operands cannot be compared");
                return Err(DbError::type_mismatch(lk, rk));
            }
            if to_right <= to_left {
                Ok((wrap_cast(left, rk)?, right))
            } else {
                Ok((left, wrap_cast(right, lk)?))
            }
        }
    }
}

fn wrap_cast(expr: Expression, target: AttrType) -> DbResult<Expression> {
    match expr {
        Expression::Value(v) => Ok(Expression::Value(cast_literal(&v, target)?)),
        other => Ok(Expression::Cast {
            child: Box::new(other),
            target,
        }),
    }
}

/// Materializes a literal into a field kind at bind time.
pub(crate) fn cast_literal(value: &Value, target: AttrType) -> DbResult<Value> {
    value.materialize(target).map_err(|e| match e {
        DbError::Unsupported { .. } => {
            warn!(from = %value.kind(), to = %target, "literal cannot be cast");
            DbError::type_mismatch(target, value.kind())
        }
        other => {
            warn!(error = %other, "literal rejected");
            other
        }
    })
}
