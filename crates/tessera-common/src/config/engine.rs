//! Engine configuration.
//!
//! Configuration is plain data with serde defaults so that a partial TOML
//! file only overrides what it names.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_PAGE_SIZE, DEFAULT_TEXT_FIELD_WIDTH, MAX_PAGE_SIZE, MIN_PAGE_SIZE, PAGE_HEADER_SIZE,
    SLOT_SIZE,
};
use crate::error::{DbError, DbResult};

/// Which transaction collaborator a session runs statements under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrxKind {
    /// Mutations are applied directly and cannot be rolled back.
    Vacuous,
    /// Mutations are recorded in an undo log and can be rolled back.
    UndoLog,
}

impl Default for TrxKind {
    fn default() -> Self {
        TrxKind::UndoLog
    }
}

impl fmt::Display for TrxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrxKind::Vacuous => write!(f, "vacuous"),
            TrxKind::UndoLog => write!(f, "undo-log"),
        }
    }
}

/// Engine configuration.
///
/// # Example
///
/// ```rust
/// use tessera_common::config::{EngineConfig, TrxKind};
///
/// let config = EngineConfig::from_toml_str("page_size = 16384").unwrap();
/// assert_eq!(config.page_size, 16384);
/// assert_eq!(config.trx_kind, TrxKind::UndoLog);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Size of each heap page in bytes. Must be a power of 2.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Declared width of a `TEXT` field when the column gives none.
    #[serde(default = "default_text_field_width")]
    pub text_field_width: usize,

    /// Transaction collaborator used by new sessions.
    #[serde(default)]
    pub trx_kind: TrxKind,

    /// Commit after each successful statement, roll back after each failed one.
    #[serde(default = "default_autocommit")]
    pub autocommit: bool,

    /// `tracing` filter directive for binaries and tests that install a subscriber.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_text_field_width() -> usize {
    DEFAULT_TEXT_FIELD_WIDTH
}

fn default_autocommit() -> bool {
    true
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            text_field_width: default_text_field_width(),
            trx_kind: TrxKind::default(),
            autocommit: default_autocommit(),
            log_filter: default_log_filter(),
        }
    }
}

impl EngineConfig {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for configuration.
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> DbResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| DbError::InvalidConfig {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates configuration from a file.
    pub fn from_file(path: &Path) -> DbResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Saves configuration to a file.
    pub fn save(&self, path: &Path) -> DbResult<()> {
        let content = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Converts configuration to a TOML string.
    pub fn to_toml(&self) -> DbResult<String> {
        toml::to_string_pretty(self).map_err(|e| DbError::InvalidConfig {
            message: e.to_string(),
        })
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> DbResult<()> {
        if self.page_size < MIN_PAGE_SIZE || self.page_size > MAX_PAGE_SIZE {
            return Err(DbError::InvalidConfig {
                message: format!(
                    "page_size must be between {} and {} bytes",
                    MIN_PAGE_SIZE, MAX_PAGE_SIZE
                ),
            });
        }

        if !self.page_size.is_power_of_two() {
            return Err(DbError::InvalidConfig {
                message: "page_size must be a power of 2".to_string(),
            });
        }

        if self.text_field_width == 0 {
            return Err(DbError::InvalidConfig {
                message: "text_field_width must be positive".to_string(),
            });
        }

        if self.text_field_width > self.max_record_size() {
            return Err(DbError::InvalidConfig {
                message: format!(
                    "text_field_width {} does not fit in a {} byte page",
                    self.text_field_width, self.page_size
                ),
            });
        }

        if self.log_filter.trim().is_empty() {
            return Err(DbError::InvalidConfig {
                message: "log_filter must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Largest record that fits in one page.
    #[must_use]
    pub fn max_record_size(&self) -> usize {
        self.page_size.saturating_sub(PAGE_HEADER_SIZE + SLOT_SIZE)
    }

    /// Number of records of `record_size` bytes a page holds (at least one).
    #[must_use]
    pub fn records_per_page(&self, record_size: usize) -> usize {
        let usable = self.page_size.saturating_sub(PAGE_HEADER_SIZE);
        (usable / (record_size + SLOT_SIZE)).max(1)
    }
}

/// Builder for engine configuration.
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    #[must_use]
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.config.page_size = page_size;
        self
    }

    /// Sets the default `TEXT` width.
    #[must_use]
    pub fn text_field_width(mut self, width: usize) -> Self {
        self.config.text_field_width = width;
        self
    }

    /// Sets the transaction kind.
    #[must_use]
    pub fn trx_kind(mut self, kind: TrxKind) -> Self {
        self.config.trx_kind = kind;
        self
    }

    /// Enables or disables autocommit.
    #[must_use]
    pub fn autocommit(mut self, enabled: bool) -> Self {
        self.config.autocommit = enabled;
        self
    }

    /// Sets the log filter directive.
    #[must_use]
    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.log_filter = filter.into();
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> DbResult<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatusCode;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.text_field_width, DEFAULT_TEXT_FIELD_WIDTH);
        assert_eq!(config.trx_kind, TrxKind::UndoLog);
        assert!(config.autocommit);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            trx_kind = "vacuous"
            autocommit = false
            "#,
        )
        .unwrap();
        assert_eq!(config.trx_kind, TrxKind::Vacuous);
        assert!(!config.autocommit);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_validate_rejects_bad_page_size() {
        let err = EngineConfig::builder().page_size(5000).build().unwrap_err();
        assert_eq!(err.code(), StatusCode::InvalidArgument);

        let err = EngineConfig::builder().page_size(1024).build().unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_validate_rejects_text_wider_than_page() {
        let result = EngineConfig::builder()
            .page_size(MIN_PAGE_SIZE)
            .text_field_width(MIN_PAGE_SIZE)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_records_per_page() {
        let config = EngineConfig::default();
        assert_eq!(
            config.records_per_page(8),
            (DEFAULT_PAGE_SIZE - PAGE_HEADER_SIZE) / 12
        );
        assert_eq!(config.records_per_page(1_000_000), 1);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tessera.toml");

        let config = EngineConfig::builder()
            .page_size(16 * 1024)
            .trx_kind(TrxKind::Vacuous)
            .build()
            .unwrap();
        config.save(&path).unwrap();

        let loaded = EngineConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_log_filter_from_toml() {
        let config = EngineConfig::from_toml_str("log_filter = \"tessera_sql=debug\"").unwrap();
        assert_eq!(config.log_filter, "tessera_sql=debug");
        assert_eq!(EngineConfig::default().log_filter, "info");

        let err = EngineConfig::builder().log_filter("  ").build().unwrap_err();
        assert!(err.to_string().contains("log_filter"));
    }

    #[test]
    fn test_malformed_toml() {
        let err = EngineConfig::from_toml_str("page_size = \"big\"").unwrap_err();
        assert!(matches!(err, DbError::InvalidConfig { .. }));
    }
}
