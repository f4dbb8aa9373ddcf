//! `Booleans` behavior.

use std::cmp::Ordering;

use tessera_common::{DbError, DbResult, CAST_FORBIDDEN};

use super::{incomparable, payload_mismatch, unsupported_cast};
use crate::{AttrType, Value};

pub(super) fn compare(left: &Value, right: &Value) -> DbResult<Ordering> {
    if right.kind() != AttrType::Booleans {
        return Err(incomparable(left, right));
    }
    let l = left.as_bool().ok_or_else(|| payload_mismatch(left))?;
    let r = right.as_bool().ok_or_else(|| payload_mismatch(right))?;
    Ok(l.cmp(&r))
}

pub(super) fn cast_to(value: &Value, target: AttrType) -> DbResult<Value> {
    let v = value.as_bool().ok_or_else(|| payload_mismatch(value))?;
    match target {
        AttrType::Ints => Ok(Value::from_int(i32::from(v))),
        _ => Err(unsupported_cast(AttrType::Booleans, target)),
    }
}

pub(super) fn cast_cost(target: AttrType) -> u32 {
    match target {
        AttrType::Booleans => 0,
        AttrType::Ints => 1,
        _ => CAST_FORBIDDEN,
    }
}

pub(super) fn parse(text: &str) -> DbResult<Value> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(Value::from_bool(true)),
        "false" | "0" => Ok(Value::from_bool(false)),
        _ => Err(DbError::invalid_argument(format!("invalid boolean: '{text}'"))),
    }
}

pub(super) fn render(value: &Value) -> String {
    match value.as_bool() {
        Some(true) => "true".to_string(),
        Some(false) => "false".to_string(),
        None => String::new(),
    }
}
