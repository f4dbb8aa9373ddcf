//! Core types for Tessera.
//!
//! This module contains the identifier types that locate tables, rows
//! and transactions.

mod ids;

pub use ids::{PageId, Rid, SlotId, TableId, TrxId};
