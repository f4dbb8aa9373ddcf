//! Field metadata.

use serde::{Deserialize, Serialize};
use tessera_types::AttrType;

/// Layout of one field inside a record.
///
/// Field metadata is owned by the catalog and never changes after the table
/// is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMeta {
    name: String,
    kind: AttrType,
    offset: usize,
    len: usize,
}

impl FieldMeta {
    /// Creates field metadata.
    pub fn new(name: impl Into<String>, kind: AttrType, offset: usize, len: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            offset,
            len,
        }
    }

    /// Field name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field kind.
    #[inline]
    pub fn kind(&self) -> AttrType {
        self.kind
    }

    /// Byte offset within the record.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Declared width in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true for a zero-width field.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte range of the field within the record.
    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.len
    }
}
