//! Database error types.
//!
//! Every statement reports exactly one [`StatusCode`]; [`DbError`] carries the
//! context behind a failing code.

use std::fmt;
use thiserror::Error;

use crate::types::{Rid, TrxId};

/// Status codes reported to the caller of a statement.
///
/// These codes are stable across versions and are what a session exposes
/// after each statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum StatusCode {
    // General (0x0000 - 0x00FF)
    /// Statement completed.
    Success = 0x0000,
    /// Internal error (bug or violated contract).
    Internal = 0x0001,
    /// Operation or cast not supported.
    Unsupported = 0x0002,
    /// Invalid argument (malformed literal, empty identifier).
    InvalidArgument = 0x0003,
    /// Allocation failed.
    OutOfMemory = 0x0004,
    /// I/O failure.
    Io = 0x0005,

    // Schema (0x0100 - 0x01FF)
    /// Referenced table does not exist.
    SchemaTableNotExist = 0x0100,
    /// Table already exists.
    SchemaTableExist = 0x0101,
    /// Referenced field does not exist.
    SchemaFieldMissing = 0x0102,
    /// Unqualified field matches more than one table.
    SchemaFieldAmbiguous = 0x0103,
    /// Value kind cannot be coerced to the field kind.
    SchemaFieldTypeMismatch = 0x0104,

    // Record (0x0200 - 0x02FF)
    /// No live record at the given RID.
    RecordNotFound = 0x0200,
    /// Record snapshot is older than the stored row.
    RecordStale = 0x0201,
    /// Table is held by a read-write scanner.
    RecordLocked = 0x0202,
    /// Opaque storage-layer failure.
    Storage = 0x0203,

    // Transaction (0x0300 - 0x03FF)
    /// Transaction-layer failure.
    Transaction = 0x0300,
}

impl StatusCode {
    /// Returns the numeric code.
    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns true for [`StatusCode::Success`].
    #[inline]
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, StatusCode::Success)
    }

    /// Returns the status category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match (*self as u16) >> 8 {
            0x00 => "General",
            0x01 => "Schema",
            0x02 => "Record",
            0x03 => "Transaction",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusCode::Success => "SUCCESS",
            StatusCode::Internal => "INTERNAL",
            StatusCode::Unsupported => "UNSUPPORTED",
            StatusCode::InvalidArgument => "INVALID_ARGUMENT",
            StatusCode::OutOfMemory => "NOMEM",
            StatusCode::Io => "IOERR",
            StatusCode::SchemaTableNotExist => "SCHEMA_TABLE_NOT_EXIST",
            StatusCode::SchemaTableExist => "SCHEMA_TABLE_EXIST",
            StatusCode::SchemaFieldMissing => "SCHEMA_FIELD_MISSING",
            StatusCode::SchemaFieldAmbiguous => "SCHEMA_FIELD_AMBIGUOUS",
            StatusCode::SchemaFieldTypeMismatch => "SCHEMA_FIELD_TYPE_MISMATCH",
            StatusCode::RecordNotFound => "RECORD_NOT_FOUND",
            StatusCode::RecordStale => "RECORD_STALE",
            StatusCode::RecordLocked => "RECORD_LOCKED",
            StatusCode::Storage => "STORAGE",
            StatusCode::Transaction => "TRANSACTION",
        };
        f.write_str(name)
    }
}

/// The main error type for Tessera.
///
/// Each variant maps onto exactly one [`StatusCode`] through [`DbError::code`].
///
/// # Example
///
/// ```rust
/// use tessera_common::error::{DbError, DbResult, StatusCode};
///
/// fn find(name: &str) -> DbResult<()> {
///     Err(DbError::SchemaTableNotExist { table: name.to_string() })
/// }
///
/// assert_eq!(find("t").unwrap_err().code(), StatusCode::SchemaTableNotExist);
/// ```
#[derive(Debug, Error)]
pub enum DbError {
    // ==========================================================================
    // General Errors
    // ==========================================================================
    /// Internal error or violated contract.
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },

    /// Operation not supported.
    #[error("unsupported: {operation}")]
    Unsupported {
        /// The unsupported operation.
        operation: String,
    },

    /// Invalid argument provided.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Error message.
        message: String,
    },

    /// Allocation failed.
    #[error("out of memory: {message}")]
    OutOfMemory {
        /// What could not be allocated.
        message: String,
    },

    /// I/O error from the underlying system.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Error message.
        message: String,
    },

    // ==========================================================================
    // Schema Errors
    // ==========================================================================
    /// Table not found.
    #[error("table '{table}' does not exist")]
    SchemaTableNotExist {
        /// The missing table.
        table: String,
    },

    /// Table already exists.
    #[error("table '{table}' already exists")]
    SchemaTableExist {
        /// The duplicate table.
        table: String,
    },

    /// Field not found.
    #[error("field '{field}' not found in {table}")]
    SchemaFieldMissing {
        /// The missing field.
        field: String,
        /// The table (or table list) searched.
        table: String,
    },

    /// Unqualified field matched more than one table.
    #[error("field '{field}' is ambiguous")]
    SchemaFieldAmbiguous {
        /// The ambiguous field.
        field: String,
    },

    /// Value kind cannot be coerced to the target kind.
    #[error("type mismatch: expected {expected}, got {actual}")]
    SchemaFieldTypeMismatch {
        /// Expected kind.
        expected: String,
        /// Actual kind.
        actual: String,
    },

    // ==========================================================================
    // Record Errors
    // ==========================================================================
    /// No live record at the given RID.
    #[error("record {rid} not found")]
    RecordNotFound {
        /// The missing RID.
        rid: Rid,
    },

    /// Record snapshot was taken before the row changed.
    #[error("record {rid} changed since it was read")]
    RecordStale {
        /// The RID of the stale snapshot.
        rid: Rid,
    },

    /// Table is held by an open read-write scanner.
    #[error("table '{table}' is locked by an open read-write scanner")]
    RecordLocked {
        /// The locked table.
        table: String,
    },

    /// Opaque storage-layer failure.
    #[error("storage error: {message}")]
    Storage {
        /// Error message.
        message: String,
    },

    // ==========================================================================
    // Transaction Errors
    // ==========================================================================
    /// Transaction-layer failure.
    #[error("transaction {trx_id} failed: {reason}")]
    Transaction {
        /// The failing transaction.
        trx_id: TrxId,
        /// Reason for failure.
        reason: String,
    },
}

impl DbError {
    /// Returns the status code for this error.
    #[must_use]
    pub const fn code(&self) -> StatusCode {
        match self {
            Self::Internal { .. } => StatusCode::Internal,
            Self::Unsupported { .. } => StatusCode::Unsupported,
            Self::InvalidArgument { .. } => StatusCode::InvalidArgument,
            Self::OutOfMemory { .. } => StatusCode::OutOfMemory,
            Self::Io { .. } => StatusCode::Io,
            Self::InvalidConfig { .. } => StatusCode::InvalidArgument,
            Self::SchemaTableNotExist { .. } => StatusCode::SchemaTableNotExist,
            Self::SchemaTableExist { .. } => StatusCode::SchemaTableExist,
            Self::SchemaFieldMissing { .. } => StatusCode::SchemaFieldMissing,
            Self::SchemaFieldAmbiguous { .. } => StatusCode::SchemaFieldAmbiguous,
            Self::SchemaFieldTypeMismatch { .. } => StatusCode::SchemaFieldTypeMismatch,
            Self::RecordNotFound { .. } => StatusCode::RecordNotFound,
            Self::RecordStale { .. } => StatusCode::RecordStale,
            Self::RecordLocked { .. } => StatusCode::RecordLocked,
            Self::Storage { .. } => StatusCode::Storage,
            Self::Transaction { .. } => StatusCode::Transaction,
        }
    }

    /// Returns true if this error was raised while binding a statement,
    /// before any mutation could have happened.
    #[must_use]
    pub const fn is_schema_error(&self) -> bool {
        matches!(self.code().as_u16() >> 8, 0x01)
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an unsupported-operation error.
    #[must_use]
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// Creates a storage error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: impl fmt::Display, actual: impl fmt::Display) -> Self {
        Self::SchemaFieldTypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}
