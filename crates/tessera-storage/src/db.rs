//! Catalog of tables.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tessera_common::config::EngineConfig;
use tessera_common::{DbError, DbResult, TableId};
use tracing::info;

use crate::table::Table;
use crate::table_meta::{AttrInfo, TableMeta};

/// A database: a named catalog of tables sharing one configuration.
#[derive(Debug)]
pub struct Db {
    name: String,
    config: EngineConfig,
    tables: RwLock<HashMap<String, Arc<Table>>>,
    next_table_id: AtomicU32,
}

impl Db {
    /// Creates an empty database.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration does not validate.
    pub fn new(name: impl Into<String>, config: EngineConfig) -> DbResult<Self> {
        config.validate()?;
        Ok(Self {
            name: name.into(),
            config,
            tables: RwLock::new(HashMap::new()),
            next_table_id: AtomicU32::new(1),
        })
    }

    /// Database name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Creates a table.
    ///
    /// # Errors
    ///
    /// Returns `SchemaTableExist` for a duplicate name, `InvalidArgument` for
    /// a bad definition, and `InvalidArgument` if a record would not fit in
    /// a page.
    pub fn create_table(&self, name: &str, attrs: &[AttrInfo]) -> DbResult<Arc<Table>> {
        let mut tables = self.tables.write();
        if tables.contains_key(name) {
            return Err(DbError::SchemaTableExist {
                table: name.to_string(),
            });
        }

        let id = TableId::new(self.next_table_id.fetch_add(1, Ordering::Relaxed));
        let meta = TableMeta::new(id, name, attrs, self.config.text_field_width)?;
        if meta.record_size() > self.config.max_record_size() {
            return Err(DbError::invalid_argument(format!(
                "record of {} bytes does not fit in a {} byte page",
                meta.record_size(),
                self.config.page_size
            )));
        }

        let records_per_page = self.config.records_per_page(meta.record_size());
        let table = Arc::new(Table::new(meta, records_per_page));
        tables.insert(name.to_string(), Arc::clone(&table));
        info!(db = %self.name, table = name, "table created");
        Ok(table)
    }

    /// Finds a table by name.
    pub fn find_table(&self, name: &str) -> Option<Arc<Table>> {
        self.tables.read().get(name).cloned()
    }

    /// Removes a table from the catalog.
    ///
    /// # Errors
    ///
    /// Returns `SchemaTableNotExist` if no such table exists; the catalog is
    /// left unchanged.
    pub fn drop_table(&self, name: &str) -> DbResult<()> {
        match self.tables.write().remove(name) {
            Some(_) => {
                info!(db = %self.name, table = name, "table dropped");
                Ok(())
            }
            None => Err(DbError::SchemaTableNotExist {
                table: name.to_string(),
            }),
        }
    }

    /// Table names in sorted order.
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }
}
