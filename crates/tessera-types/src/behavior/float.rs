//! `Floats` behavior.

use std::cmp::Ordering;

use tessera_common::{DbError, DbResult, CAST_FORBIDDEN};

use super::{incomparable, payload_mismatch, unsupported_cast};
use crate::{AttrType, Value};

pub(super) fn compare(left: &Value, right: &Value) -> DbResult<Ordering> {
    match right.kind() {
        AttrType::Ints | AttrType::Floats => compare_numeric(left, right),
        _ => Err(incomparable(left, right)),
    }
}

/// Compares two numeric values after promoting both to float.
pub(super) fn compare_numeric(left: &Value, right: &Value) -> DbResult<Ordering> {
    let l = left.as_float().ok_or_else(|| payload_mismatch(left))?;
    let r = right.as_float().ok_or_else(|| payload_mismatch(right))?;
    Ok(l.total_cmp(&r))
}

pub(super) fn cast_to(value: &Value, target: AttrType) -> DbResult<Value> {
    let v = value.as_float().ok_or_else(|| payload_mismatch(value))?;
    match target {
        // truncates toward zero, saturating at the i32 range
        AttrType::Ints => Ok(Value::from_int(v as i32)),
        _ => Err(unsupported_cast(AttrType::Floats, target)),
    }
}

pub(super) fn cast_cost(target: AttrType) -> u32 {
    match target {
        AttrType::Floats => 0,
        AttrType::Ints => 2,
        _ => CAST_FORBIDDEN,
    }
}

pub(super) fn parse(text: &str) -> DbResult<Value> {
    text.trim()
        .parse::<f32>()
        .map(Value::from_float)
        .map_err(|_| DbError::invalid_argument(format!("invalid float: '{text}'")))
}

/// At most two decimals, trailing zeros trimmed.
pub(super) fn render(value: &Value) -> String {
    let Some(v) = value.as_float() else {
        return String::new();
    };
    let mut s = format!("{v:.2}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}
