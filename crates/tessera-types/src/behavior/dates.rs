//! `Dates` behavior. Packed dates compare as integers.

use std::cmp::Ordering;

use tessera_common::{DbResult, CAST_FORBIDDEN};

use super::{incomparable, payload_mismatch, unsupported_cast};
use crate::date::{date_to_str, str_to_date};
use crate::{AttrType, Value};

pub(super) fn compare(left: &Value, right: &Value) -> DbResult<Ordering> {
    if right.kind() != AttrType::Dates {
        return Err(incomparable(left, right));
    }
    let l = left.as_int().ok_or_else(|| payload_mismatch(left))?;
    let r = right.as_int().ok_or_else(|| payload_mismatch(right))?;
    Ok(l.cmp(&r))
}

pub(super) fn cast_to(value: &Value, target: AttrType) -> DbResult<Value> {
    let packed = value.as_int().ok_or_else(|| payload_mismatch(value))?;
    match target {
        AttrType::Ints => Ok(Value::from_int(packed)),
        _ => Err(unsupported_cast(AttrType::Dates, target)),
    }
}

pub(super) fn cast_cost(target: AttrType) -> u32 {
    match target {
        AttrType::Dates => 0,
        AttrType::Ints => 1,
        _ => CAST_FORBIDDEN,
    }
}

pub(super) fn parse(text: &str) -> DbResult<Value> {
    str_to_date(text).map(Value::from_date)
}

pub(super) fn render(value: &Value) -> String {
    value.as_int().map(date_to_str).unwrap_or_default()
}
