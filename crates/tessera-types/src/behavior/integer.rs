//! `Ints` behavior.

use std::cmp::Ordering;

use tessera_common::{DbError, DbResult, CAST_FORBIDDEN};

use super::{float, incomparable, payload_mismatch, unsupported_cast};
use crate::{AttrType, Value};

pub(super) fn compare(left: &Value, right: &Value) -> DbResult<Ordering> {
    match right.kind() {
        AttrType::Ints => {
            let l = left.as_int().ok_or_else(|| payload_mismatch(left))?;
            let r = right.as_int().ok_or_else(|| payload_mismatch(right))?;
            Ok(l.cmp(&r))
        }
        AttrType::Floats => float::compare_numeric(left, right),
        _ => Err(incomparable(left, right)),
    }
}

pub(super) fn cast_to(value: &Value, target: AttrType) -> DbResult<Value> {
    let v = value.as_int().ok_or_else(|| payload_mismatch(value))?;
    match target {
        AttrType::Floats => Ok(Value::from_float(v as f32)),
        _ => Err(unsupported_cast(AttrType::Ints, target)),
    }
}

pub(super) fn cast_cost(target: AttrType) -> u32 {
    match target {
        AttrType::Ints => 0,
        AttrType::Floats => 1,
        _ => CAST_FORBIDDEN,
    }
}

pub(super) fn parse(text: &str) -> DbResult<Value> {
    text.trim()
        .parse::<i32>()
        .map(Value::from_int)
        .map_err(|_| DbError::invalid_argument(format!("invalid integer: '{text}'")))
}

pub(super) fn render(value: &Value) -> String {
    value.as_int().map(|v| v.to_string()).unwrap_or_default()
}
