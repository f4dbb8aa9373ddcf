//! # tessera-common
//!
//! Common types, errors, and configuration for Tessera.
//!
//! This crate provides the foundational pieces shared by every Tessera
//! component:
//!
//! - **Types**: row locators (`PageId`, `SlotId`, `Rid`) and identifiers (`TableId`, `TrxId`)
//! - **Errors**: the statement-level error taxonomy `DbError` and its `StatusCode`
//! - **Config**: engine configuration loaded from TOML
//! - **Constants**: page layout and field width limits
//!
//! ## Example
//!
//! ```rust
//! use tessera_common::error::{DbError, DbResult, StatusCode};
//! use tessera_common::types::{PageId, Rid};
//!
//! fn locate(page: u64, slot: u16) -> DbResult<Rid> {
//!     if slot == u16::MAX {
//!         return Err(DbError::invalid_argument("slot out of range"));
//!     }
//!     Ok(Rid::new(PageId::new(page), slot))
//! }
//!
//! assert!(locate(1, 2).is_ok());
//! assert_eq!(locate(1, u16::MAX).unwrap_err().code(), StatusCode::InvalidArgument);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items at the crate root
pub use config::{EngineConfig, TrxKind};
pub use constants::*;
pub use error::{DbError, DbResult, StatusCode};
pub use types::{PageId, Rid, SlotId, TableId, TrxId};
