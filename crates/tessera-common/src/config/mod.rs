//! Configuration for Tessera.
//!
//! This module provides the engine configuration and its TOML loading.

mod engine;

pub use engine::{EngineConfig, EngineConfigBuilder, TrxKind};
