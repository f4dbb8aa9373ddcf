//! Packed date codec.
//!
//! A date is stored as the integer `YYYY*10000 + MM*100 + DD`, so ordering
//! the packed integers orders the dates chronologically.

use tessera_common::{DbError, DbResult};
use tracing::warn;

/// Smallest accepted year.
pub const MIN_YEAR: i32 = 1;

/// Largest accepted year.
pub const MAX_YEAR: i32 = 9999;

const DAYS_IN_MONTH: [u32; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Gregorian leap-year rule.
#[inline]
#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 4 == 0 && year % 100 != 0)
}

/// Number of days in `month` of `year`, or 0 for an invalid month.
#[must_use]
pub const fn days_in_month(year: i32, month: u32) -> u32 {
    if month < 1 || month > 12 {
        return 0;
    }
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

/// Checks year, month and day ranges, including the leap-year rule.
#[must_use]
pub const fn is_valid_date(year: i32, month: u32, day: u32) -> bool {
    if year < MIN_YEAR || year > MAX_YEAR {
        return false;
    }
    day >= 1 && day <= days_in_month(year, month)
}

/// Packs components without validating them.
#[inline]
#[must_use]
pub const fn encode(year: i32, month: u32, day: u32) -> i32 {
    year * 10000 + (month as i32) * 100 + day as i32
}

/// Splits a packed date into `(year, month, day)`.
#[inline]
#[must_use]
pub const fn decode(packed: i32) -> (i32, u32, u32) {
    let year = packed / 10000;
    let month = ((packed % 10000) / 100) as u32;
    let day = (packed % 100) as u32;
    (year, month, day)
}

/// Parses `Y-M-D` into a packed date.
///
/// Exactly three decimal components are required. Surrounding whitespace is
/// ignored and components may omit leading zeros (`2024-2-9`).
///
/// # Errors
///
/// Returns `InvalidArgument` for malformed text or out-of-range components.
pub fn str_to_date(text: &str) -> DbResult<i32> {
    let parts: Vec<&str> = text.trim().split('-').collect();
    if parts.len() != 3 {
        warn!(date = text, "invalid date format");
        return Err(DbError::invalid_argument(format!(
            "invalid date format: '{text}'"
        )));
    }

    let year = parse_component(parts[0], text)?;
    let month = parse_component(parts[1], text)?;
    let day = parse_component(parts[2], text)?;

    let (Ok(year), Ok(month), Ok(day)) = (
        i32::try_from(year),
        u32::try_from(month),
        u32::try_from(day),
    ) else {
        return Err(DbError::invalid_argument(format!(
            "invalid date value: '{text}'"
        )));
    };

    if !is_valid_date(year, month, day) {
        warn!(year, month, day, "invalid date value");
        return Err(DbError::invalid_argument(format!(
            "invalid date value: '{text}'"
        )));
    }

    Ok(encode(year, month, day))
}

fn parse_component(part: &str, text: &str) -> DbResult<u64> {
    if part.is_empty() || part.len() > 9 || !part.bytes().all(|b| b.is_ascii_digit()) {
        warn!(date = text, "invalid date format");
        return Err(DbError::invalid_argument(format!(
            "invalid date format: '{text}'"
        )));
    }
    part.parse::<u64>()
        .map_err(|_| DbError::invalid_argument(format!("invalid date format: '{text}'")))
}

/// Renders a packed date as zero-padded `YYYY-MM-DD`.
#[must_use]
pub fn date_to_str(packed: i32) -> String {
    let (year, month, day) = decode(packed);
    format!("{year:04}-{month:02}-{day:02}")
}
