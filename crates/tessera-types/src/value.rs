//! Typed scalar values.

use std::cmp::Ordering;
use std::fmt;

use bytes::Bytes;
use tessera_common::{DbError, DbResult};

use crate::behavior;
use crate::AttrType;

/// Storage for a value: inline scalar or a byte span.
#[derive(Debug, Clone, PartialEq)]
enum Payload {
    Int(i32),
    Float(f32),
    Bool(bool),
    Bytes(Bytes),
}

/// One scalar of one [`AttrType`].
///
/// `length` equals the fixed width for scalar kinds and the byte length of
/// the span for character kinds. Kind and payload only change together,
/// through the `set_*` mutators.
///
/// # Example
///
/// ```rust
/// use tessera_types::{AttrType, Value};
///
/// let mut v = Value::from_int(7);
/// assert_eq!(v.length(), 4);
///
/// v.set_chars("seven");
/// assert_eq!(v.kind(), AttrType::Chars);
/// assert_eq!(v.length(), 5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    kind: AttrType,
    length: usize,
    payload: Payload,
}

impl Value {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Creates an `Ints` value.
    #[must_use]
    pub fn from_int(v: i32) -> Self {
        Self::scalar(AttrType::Ints, Payload::Int(v))
    }

    /// Creates a `Floats` value.
    #[must_use]
    pub fn from_float(v: f32) -> Self {
        Self::scalar(AttrType::Floats, Payload::Float(v))
    }

    /// Creates a `Booleans` value.
    #[must_use]
    pub fn from_bool(v: bool) -> Self {
        Self::scalar(AttrType::Booleans, Payload::Bool(v))
    }

    /// Creates a `Dates` value from a packed date.
    #[must_use]
    pub fn from_date(packed: i32) -> Self {
        Self::scalar(AttrType::Dates, Payload::Int(packed))
    }

    /// Creates a `Chars` value.
    #[must_use]
    pub fn from_chars(data: impl Into<Bytes>) -> Self {
        Self::character(AttrType::Chars, data.into())
    }

    /// Creates a `Text` value.
    #[must_use]
    pub fn from_text(data: impl Into<Bytes>) -> Self {
        Self::character(AttrType::Text, data.into())
    }

    fn scalar(kind: AttrType, payload: Payload) -> Self {
        Self {
            kind,
            length: kind.fixed_width().unwrap_or(0),
            payload,
        }
    }

    fn character(kind: AttrType, data: Bytes) -> Self {
        Self {
            kind,
            length: data.len(),
            payload: Payload::Bytes(data),
        }
    }

    /// Parses `text` as a value of `kind`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for malformed text.
    pub fn parse(kind: AttrType, text: &str) -> DbResult<Self> {
        behavior::parse_from_text(kind, text)
    }

    /// Decodes a value from its on-record field bytes.
    ///
    /// Character fields are zero padded, so the value ends at the first NUL.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if a scalar field has the wrong width.
    pub fn from_field_bytes(kind: AttrType, bytes: &[u8]) -> DbResult<Self> {
        if let Some(width) = kind.fixed_width() {
            if bytes.len() != width {
                return Err(DbError::internal(format!(
                    "{kind} field has {} bytes, expected {width}",
                    bytes.len()
                )));
            }
        }

        let value = match kind {
            AttrType::Ints => Self::from_int(i32::from_le_bytes(le4(bytes))),
            AttrType::Floats => Self::from_float(f32::from_le_bytes(le4(bytes))),
            AttrType::Booleans => Self::from_bool(bytes[0] != 0),
            AttrType::Dates => Self::from_date(i32::from_le_bytes(le4(bytes))),
            AttrType::Chars | AttrType::Text => {
                let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
                Self::character(kind, Bytes::copy_from_slice(&bytes[..end]))
            }
        };
        Ok(value)
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Replaces this value with an `Ints` value.
    pub fn set_int(&mut self, v: i32) {
        *self = Self::from_int(v);
    }

    /// Replaces this value with a `Floats` value.
    pub fn set_float(&mut self, v: f32) {
        *self = Self::from_float(v);
    }

    /// Replaces this value with a `Booleans` value.
    pub fn set_bool(&mut self, v: bool) {
        *self = Self::from_bool(v);
    }

    /// Replaces this value with a `Dates` value.
    pub fn set_date(&mut self, packed: i32) {
        *self = Self::from_date(packed);
    }

    /// Replaces this value with a `Chars` value.
    pub fn set_chars(&mut self, data: impl Into<Bytes>) {
        *self = Self::from_chars(data);
    }

    /// Replaces this value with a `Text` value.
    pub fn set_text(&mut self, data: impl Into<Bytes>) {
        *self = Self::from_text(data);
    }

    // =========================================================================
    // Access
    // =========================================================================

    /// Returns the kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> AttrType {
        self.kind
    }

    /// Returns the byte length.
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Integer payload of `Ints` and `Dates` values.
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self.payload {
            Payload::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Numeric payload, promoting `Ints` to float.
    #[must_use]
    pub fn as_float(&self) -> Option<f32> {
        match (self.kind, &self.payload) {
            (AttrType::Floats, Payload::Float(v)) => Some(*v),
            (AttrType::Ints, Payload::Int(v)) => Some(*v as f32),
            _ => None,
        }
    }

    /// Boolean payload.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.payload {
            Payload::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Character payload.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.payload {
            Payload::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Serializes the value the way a record field stores it.
    ///
    /// Scalars are little-endian; character kinds yield their raw bytes.
    #[must_use]
    pub fn to_field_bytes(&self) -> Bytes {
        match &self.payload {
            Payload::Int(v) => Bytes::copy_from_slice(&v.to_le_bytes()),
            Payload::Float(v) => Bytes::copy_from_slice(&v.to_le_bytes()),
            Payload::Bool(v) => Bytes::copy_from_slice(&[u8::from(*v)]),
            Payload::Bytes(b) => b.clone(),
        }
    }

    // =========================================================================
    // Behavior
    // =========================================================================

    /// Compares two values of comparable kinds.
    ///
    /// # Errors
    ///
    /// Returns `Internal` when the kinds cannot be compared.
    pub fn compare(&self, other: &Value) -> DbResult<Ordering> {
        behavior::compare(self, other)
    }

    /// Casts to `target`.
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` for a pair outside the cast whitelist and
    /// `InvalidArgument` when the content cannot be converted.
    pub fn cast_to(&self, target: AttrType) -> DbResult<Value> {
        behavior::cast_to(self, target)
    }

    /// Turns a literal into a value of `target`.
    ///
    /// Character literals aimed at a scalar kind are parsed as text, so
    /// `'true'` becomes a boolean and `'1.5'` a float. Every other pair
    /// goes through [`Value::cast_to`].
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for text that does not parse, otherwise the
    /// errors of [`Value::cast_to`].
    pub fn materialize(&self, target: AttrType) -> DbResult<Value> {
        if self.kind() == target {
            return Ok(self.clone());
        }
        if self.kind().is_character() && !target.is_character() {
            return Self::parse(target, &behavior::render_to_text(self));
        }
        self.cast_to(target)
    }
}

fn le4(bytes: &[u8]) -> [u8; 4] {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    buf
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&behavior::render_to_text(self))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::from_int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::from_float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::from_bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::from_chars(Bytes::copy_from_slice(v.as_bytes()))
    }
}
