//! `Chars` and `Text` behavior.

use std::cmp::Ordering;

use tessera_common::{DbResult, CAST_FORBIDDEN};

use super::{incomparable, payload_mismatch, unsupported_cast};
use crate::{AttrType, Value};

/// Byte-wise over the common prefix, then shorter first.
pub(super) fn compare(left: &Value, right: &Value) -> DbResult<Ordering> {
    if !left.kind().is_character() || !right.kind().is_character() {
        return Err(incomparable(left, right));
    }
    let l = left.as_bytes().ok_or_else(|| payload_mismatch(left))?;
    let r = right.as_bytes().ok_or_else(|| payload_mismatch(right))?;
    let n = l.len().min(r.len());
    Ok(l[..n].cmp(&r[..n]).then(l.len().cmp(&r.len())))
}

pub(super) fn cast_to(value: &Value, target: AttrType) -> DbResult<Value> {
    let bytes = value.as_bytes().ok_or_else(|| payload_mismatch(value))?;
    let source = value.kind();
    match (source, target) {
        (_, AttrType::Dates) => super::dates::parse(&String::from_utf8_lossy(bytes)),
        (AttrType::Chars, AttrType::Text) => Ok(Value::from_text(bytes.to_vec())),
        _ => Err(unsupported_cast(source, target)),
    }
}

pub(super) fn cast_cost_from_chars(target: AttrType) -> u32 {
    match target {
        AttrType::Chars | AttrType::Text | AttrType::Dates => 0,
        _ => CAST_FORBIDDEN,
    }
}

pub(super) fn cast_cost_from_text(target: AttrType) -> u32 {
    match target {
        AttrType::Text | AttrType::Dates => 0,
        _ => CAST_FORBIDDEN,
    }
}

/// Emits exactly `length` bytes, embedded NULs included.
pub(super) fn render(value: &Value) -> String {
    value
        .as_bytes()
        .map(|b| String::from_utf8_lossy(&b[..value.length()]).into_owned())
        .unwrap_or_default()
}
