//! Per-kind behavior table.
//!
//! Each attribute kind has a module of pure functions. The free functions
//! here select the module with an exhaustive `match` on [`AttrType`].

mod boolean;
mod chars;
mod dates;
mod float;
mod integer;

use std::cmp::Ordering;

use tessera_common::{DbError, DbResult, CAST_FORBIDDEN};

use crate::{AttrType, Value};

/// Compares two values.
///
/// Allowed pairs are same-kind, `Chars`/`Text` in either order and
/// `Ints`/`Floats` in either order.
///
/// # Errors
///
/// Any other pair is a contract violation and returns `Internal`.
pub fn compare(left: &Value, right: &Value) -> DbResult<Ordering> {
    match left.kind() {
        AttrType::Ints => integer::compare(left, right),
        AttrType::Floats => float::compare(left, right),
        AttrType::Booleans => boolean::compare(left, right),
        AttrType::Dates => dates::compare(left, right),
        AttrType::Chars | AttrType::Text => chars::compare(left, right),
    }
}

/// Casts `value` to `target`. Casting to the value's own kind is a copy.
///
/// # Errors
///
/// Returns `Unsupported` for pairs outside the whitelist and
/// `InvalidArgument` when the content does not convert.
pub fn cast_to(value: &Value, target: AttrType) -> DbResult<Value> {
    if value.kind() == target {
        return Ok(value.clone());
    }
    match value.kind() {
        AttrType::Ints => integer::cast_to(value, target),
        AttrType::Floats => float::cast_to(value, target),
        AttrType::Booleans => boolean::cast_to(value, target),
        AttrType::Dates => dates::cast_to(value, target),
        AttrType::Chars | AttrType::Text => chars::cast_to(value, target),
    }
}

/// Cost of implicitly coercing `from` into `to`.
///
/// `0` is lossless; [`CAST_FORBIDDEN`] means the cast is not allowed.
/// The table is asymmetric: `Chars` to `Text` is free while `Text` to
/// `Chars` is forbidden.
#[must_use]
pub fn cast_cost(from: AttrType, to: AttrType) -> u32 {
    match from {
        AttrType::Ints => integer::cast_cost(to),
        AttrType::Floats => float::cast_cost(to),
        AttrType::Booleans => boolean::cast_cost(to),
        AttrType::Dates => dates::cast_cost(to),
        AttrType::Chars => chars::cast_cost_from_chars(to),
        AttrType::Text => chars::cast_cost_from_text(to),
    }
}

/// Returns true if `from` can be cast to `to`.
#[inline]
#[must_use]
pub fn can_cast(from: AttrType, to: AttrType) -> bool {
    cast_cost(from, to) != CAST_FORBIDDEN
}

/// Builds a value of `kind` from literal text.
///
/// # Errors
///
/// Returns `InvalidArgument` for malformed text.
pub fn parse_from_text(kind: AttrType, text: &str) -> DbResult<Value> {
    match kind {
        AttrType::Ints => integer::parse(text),
        AttrType::Floats => float::parse(text),
        AttrType::Booleans => boolean::parse(text),
        AttrType::Dates => dates::parse(text),
        AttrType::Chars => Ok(Value::from_chars(text.to_owned())),
        AttrType::Text => Ok(Value::from_text(text.to_owned())),
    }
}

/// Renders a value as text.
///
/// Character kinds emit exactly `length` bytes.
#[must_use]
pub fn render_to_text(value: &Value) -> String {
    match value.kind() {
        AttrType::Ints => integer::render(value),
        AttrType::Floats => float::render(value),
        AttrType::Booleans => boolean::render(value),
        AttrType::Dates => dates::render(value),
        AttrType::Chars | AttrType::Text => chars::render(value),
    }
}

fn incomparable(left: &Value, right: &Value) -> DbError {
    DbError::internal(format!(
        "cannot compare {} with {}",
        left.kind(),
        right.kind()
    ))
}

fn unsupported_cast(from: AttrType, to: AttrType) -> DbError {
    DbError::unsupported(format!("cast from {from} to {to}"))
}

fn payload_mismatch(value: &Value) -> DbError {
    DbError::internal(format!("{} value carries a foreign payload", value.kind()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_common::StatusCode;

    #[test]
    fn test_cast_cost_table() {
        use AttrType::*;
        let expect = [
            (Ints, Ints, 0),
            (Ints, Floats, 1),
            (Floats, Ints, 2),
            (Floats, Floats, 0),
            (Booleans, Ints, 1),
            (Booleans, Booleans, 0),
            (Dates, Dates, 0),
            (Dates, Ints, 1),
            (Chars, Chars, 0),
            (Chars, Text, 0),
            (Chars, Dates, 0),
            (Text, Text, 0),
            (Text, Dates, 0),
        ];
        for from in AttrType::ALL {
            for to in AttrType::ALL {
                let want = expect
                    .iter()
                    .find(|(f, t, _)| *f == from && *t == to)
                    .map_or(CAST_FORBIDDEN, |(_, _, c)| *c);
                assert_eq!(cast_cost(from, to), want, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_chars_text_asymmetry() {
        assert_eq!(cast_cost(AttrType::Chars, AttrType::Text), 0);
        assert_eq!(cast_cost(AttrType::Text, AttrType::Chars), CAST_FORBIDDEN);

        let err = Value::from_text("long text").cast_to(AttrType::Chars).unwrap_err();
        assert_eq!(err.code(), StatusCode::Unsupported);
    }

    #[test]
    fn test_supported_casts_succeed() {
        let samples = [
            Value::from_int(3),
            Value::from_float(2.5),
            Value::from_bool(true),
            Value::from_date(20240229),
            Value::from("2024-02-29"),
            Value::from_text("2024-02-29"),
        ];
        for v in &samples {
            for to in AttrType::ALL {
                let result = cast_to(v, to);
                assert_eq!(
                    result.is_ok(),
                    can_cast(v.kind(), to),
                    "{} -> {to}",
                    v.kind()
                );
                if let Ok(cast) = result {
                    assert_eq!(cast.kind(), to);
                }
            }
        }
    }

    #[test]
    fn test_compare_mixed_kinds() {
        let i = Value::from_int(2);
        let f = Value::from_float(2.5);
        assert_eq!(compare(&i, &f).unwrap(), Ordering::Less);
        assert_eq!(compare(&f, &i).unwrap(), Ordering::Greater);

        let c = Value::from("abc");
        let t = Value::from_text("abd");
        assert_eq!(compare(&c, &t).unwrap(), Ordering::Less);
    }

    #[test]
    fn test_compare_incompatible_kinds() {
        let err = compare(&Value::from_int(1), &Value::from("1")).unwrap_err();
        assert_eq!(err.code(), StatusCode::Internal);
        assert!(compare(&Value::from_date(20240101), &Value::from_int(1)).is_err());
        assert!(compare(&Value::from("a"), &Value::from_bool(true)).is_err());
    }

    #[test]
    fn test_parse_and_render() {
        for (kind, text, rendered) in [
            (AttrType::Ints, "-42", "-42"),
            (AttrType::Floats, "1.50", "1.5"),
            (AttrType::Floats, "3", "3"),
            (AttrType::Booleans, "TRUE", "true"),
            (AttrType::Booleans, "0", "false"),
            (AttrType::Dates, "2024-2-9", "2024-02-09"),
            (AttrType::Chars, "a b", "a b"),
        ] {
            let v = parse_from_text(kind, text).unwrap();
            assert_eq!(v.kind(), kind);
            assert_eq!(render_to_text(&v), rendered);
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for (kind, text) in [
            (AttrType::Ints, "12x"),
            (AttrType::Floats, "abc"),
            (AttrType::Booleans, "maybe"),
            (AttrType::Dates, "2023-02-29"),
        ] {
            let err = parse_from_text(kind, text).unwrap_err();
            assert_eq!(err.code(), StatusCode::InvalidArgument, "{kind} {text}");
        }
    }
}
