//! # tessera-types
//!
//! Typed scalar values for Tessera.
//!
//! This crate provides:
//!
//! - [`AttrType`]: the closed set of attribute kinds a field can hold
//! - [`Value`]: one scalar of one kind, with its byte length
//! - [`date`]: the packed `YYYYMMDD` date codec
//! - [`behavior`]: per-kind compare, cast, cast cost, parse and render
//!
//! ## Example
//!
//! ```rust
//! use tessera_types::{AttrType, Value};
//!
//! let literal = Value::from_chars("2024-02-29");
//! let date = literal.cast_to(AttrType::Dates).unwrap();
//! assert_eq!(date.kind(), AttrType::Dates);
//! assert_eq!(date.to_string(), "2024-02-29");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod attr_type;
pub mod behavior;
pub mod date;
mod value;

pub use attr_type::AttrType;
pub use behavior::cast_cost;
pub use value::Value;
