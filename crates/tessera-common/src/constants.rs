//! System-wide constants for Tessera.
//!
//! Limits that shape the in-memory record layout live here so that the
//! storage layer and configuration validation agree on them.

// =============================================================================
// Page Constants
// =============================================================================

/// Default page size in bytes (8 KB).
pub const DEFAULT_PAGE_SIZE: usize = 8 * 1024;

/// Minimum page size in bytes (4 KB).
pub const MIN_PAGE_SIZE: usize = 4 * 1024;

/// Maximum page size in bytes (64 KB).
pub const MAX_PAGE_SIZE: usize = 64 * 1024;

/// Page header size in bytes.
///
/// Reserved for page id, slot count and free-slot hint.
pub const PAGE_HEADER_SIZE: usize = 32;

/// Per-record slot directory overhead in bytes.
pub const SLOT_SIZE: usize = 4;

// =============================================================================
// Field Constants
// =============================================================================

/// Width of an `INT` field in bytes.
pub const INT_FIELD_WIDTH: usize = 4;

/// Width of a `FLOAT` field in bytes.
pub const FLOAT_FIELD_WIDTH: usize = 4;

/// Width of a `BOOLEAN` field in bytes.
pub const BOOLEAN_FIELD_WIDTH: usize = 1;

/// Width of a `DATE` field in bytes (packed `YYYYMMDD` integer).
pub const DATE_FIELD_WIDTH: usize = 4;

/// Default declared width of a `TEXT` field in bytes.
pub const DEFAULT_TEXT_FIELD_WIDTH: usize = 4096;

/// Maximum length of a table or field name.
pub const MAX_IDENTIFIER_LEN: usize = 64;

// =============================================================================
// Cast Constants
// =============================================================================

/// Cast cost meaning "this coercion is forbidden".
pub const CAST_FORBIDDEN: u32 = u32::MAX;
