//! Error handling for Tessera.
//!
//! This module provides the unified error type and result alias used
//! across all Tessera components.

mod database;

pub use database::{DbError, StatusCode};

/// Result type alias for Tessera operations.
pub type DbResult<T> = std::result::Result<T, DbError>;
