//! Attribute kinds.

use std::fmt;

use serde::{Deserialize, Serialize};
use tessera_common::constants::{
    BOOLEAN_FIELD_WIDTH, DATE_FIELD_WIDTH, FLOAT_FIELD_WIDTH, INT_FIELD_WIDTH,
};

/// The kind of value a field holds.
///
/// Scalar kinds have a fixed on-record width. Character kinds take their
/// width from the field declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttrType {
    /// 32-bit signed integer.
    Ints,
    /// 32-bit float.
    Floats,
    /// Boolean stored as one byte.
    Booleans,
    /// Date packed as `YYYY*10000 + MM*100 + DD`.
    Dates,
    /// Fixed-width character data, `CHAR(n)`.
    Chars,
    /// Long character data, `TEXT`.
    Text,
}

impl AttrType {
    /// All kinds, in declaration order.
    pub const ALL: [AttrType; 6] = [
        AttrType::Ints,
        AttrType::Floats,
        AttrType::Booleans,
        AttrType::Dates,
        AttrType::Chars,
        AttrType::Text,
    ];

    /// Returns the on-record width for scalar kinds, `None` for character kinds.
    #[inline]
    #[must_use]
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            AttrType::Ints => Some(INT_FIELD_WIDTH),
            AttrType::Floats => Some(FLOAT_FIELD_WIDTH),
            AttrType::Booleans => Some(BOOLEAN_FIELD_WIDTH),
            AttrType::Dates => Some(DATE_FIELD_WIDTH),
            AttrType::Chars | AttrType::Text => None,
        }
    }

    /// Returns true for `Chars` and `Text`.
    #[inline]
    #[must_use]
    pub const fn is_character(self) -> bool {
        matches!(self, AttrType::Chars | AttrType::Text)
    }

    /// Returns true for `Ints` and `Floats`.
    #[inline]
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, AttrType::Ints | AttrType::Floats)
    }

    /// Upper-case kind name used in messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            AttrType::Ints => "INTS",
            AttrType::Floats => "FLOATS",
            AttrType::Booleans => "BOOLEANS",
            AttrType::Dates => "DATES",
            AttrType::Chars => "CHARS",
            AttrType::Text => "TEXT",
        }
    }

    /// Resolves a SQL type keyword (`int`, `char`, `date`, ...).
    #[must_use]
    pub fn from_sql_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "int" | "integer" | "ints" => Some(AttrType::Ints),
            "float" | "real" | "floats" => Some(AttrType::Floats),
            "bool" | "boolean" | "booleans" => Some(AttrType::Booleans),
            "date" | "dates" => Some(AttrType::Dates),
            "char" | "chars" | "varchar" => Some(AttrType::Chars),
            "text" => Some(AttrType::Text),
            _ => None,
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
