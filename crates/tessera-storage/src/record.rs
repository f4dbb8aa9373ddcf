//! Records and record staging buffers.
//!
//! [`Record`] is a read-only snapshot of a row as it was when fetched.
//! [`RecordBuf`] is where new row images are assembled; its only field
//! writer is [`RecordBuf::field_mut`], which hands out a slice of exactly
//! the field's width.

use bytes::{Bytes, BytesMut};
use tessera_common::{DbError, DbResult, Rid};
use tessera_types::Value;

use crate::field::FieldMeta;

/// Snapshot of one stored row.
///
/// The snapshot carries the slot generation it was read at. Any mutation of
/// the row bumps the generation, after which mutating through this snapshot
/// fails with `RecordStale`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    rid: Rid,
    generation: u64,
    data: Bytes,
}

impl Record {
    pub(crate) fn new(rid: Rid, generation: u64, data: Bytes) -> Self {
        Self {
            rid,
            generation,
            data,
        }
    }

    /// Stable row locator.
    #[inline]
    pub fn rid(&self) -> Rid {
        self.rid
    }

    /// Slot generation this snapshot was read at.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Raw record bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Record width in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true for a zero-width record.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes of one field.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the field does not lie within the record.
    pub fn field_bytes(&self, field: &FieldMeta) -> DbResult<&[u8]> {
        self.data
            .get(field.range())
            .ok_or_else(|| out_of_bounds(field, self.data.len()))
    }

    /// Decodes one field into a value.
    pub fn value(&self, field: &FieldMeta) -> DbResult<Value> {
        Value::from_field_bytes(field.kind(), self.field_bytes(field)?)
    }
}

/// Mutable, zero-initialized row image awaiting insert or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordBuf {
    data: BytesMut,
}

impl RecordBuf {
    /// Creates a zero-filled buffer of `size` bytes.
    pub fn zeroed(size: usize) -> Self {
        Self {
            data: BytesMut::zeroed(size),
        }
    }

    /// Copies the current bytes of a record.
    pub fn from_record(record: &Record) -> Self {
        Self {
            data: BytesMut::from(record.data()),
        }
    }

    /// Wraps raw bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self {
            data: BytesMut::from(data),
        }
    }

    /// Mutable slice of exactly `field.len()` bytes.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the field does not lie within the buffer.
    pub fn field_mut(&mut self, field: &FieldMeta) -> DbResult<&mut [u8]> {
        let len = self.data.len();
        self.data
            .get_mut(field.range())
            .ok_or_else(|| out_of_bounds(field, len))
    }

    /// Overwrites a field with `src`, copying at most the field width and
    /// zero-filling the remainder of the field. Returns the bytes copied.
    pub fn write_field(&mut self, field: &FieldMeta, src: &[u8]) -> DbResult<usize> {
        let dst = self.field_mut(field)?;
        let n = dst.len().min(src.len());
        dst[..n].copy_from_slice(&src[..n]);
        dst[n..].fill(0);
        Ok(n)
    }

    /// Buffer contents.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Buffer width in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true for an empty buffer.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Freezes into immutable bytes.
    pub fn freeze(self) -> Bytes {
        self.data.freeze()
    }
}

fn out_of_bounds(field: &FieldMeta, len: usize) -> DbError {
    DbError::internal(format!(
        "field '{}' at {}..{} exceeds record of {len} bytes",
        field.name(),
        field.offset(),
        field.offset() + field.len()
    ))
}
