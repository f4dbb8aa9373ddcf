//! # tessera-storage
//!
//! Record storage for Tessera.
//!
//! This crate provides the storage collaborators the query layer consumes:
//!
//! - **Metadata**: [`FieldMeta`] and [`TableMeta`], the catalog-owned record layout
//! - **Records**: immutable [`Record`] snapshots and mutable [`RecordBuf`] staging buffers
//! - **Heap**: an in-memory slotted heap that hands out stable [`Rid`]s
//! - **Scanning**: [`RecordScanner`] in read-only or read-write mode
//! - **Catalog**: [`Db`], which creates, finds and drops [`Table`]s
//!
//! A `Record` remembers the slot generation it was read at. Updating or
//! deleting through a snapshot taken before the row last changed fails with
//! `RecordStale`, so callers must re-fetch by RID after any mutation.
//!
//! ## Example
//!
//! ```rust
//! use tessera_common::config::EngineConfig;
//! use tessera_storage::{AttrInfo, Db};
//! use tessera_types::{AttrType, Value};
//!
//! let db = Db::new("demo", EngineConfig::default()).unwrap();
//! let table = db
//!     .create_table(
//!         "t",
//!         &[AttrInfo::new("id", AttrType::Ints), AttrInfo::chars("name", 4)],
//!     )
//!     .unwrap();
//!
//! let buf = table.make_record(&[Value::from_int(1), Value::from("ab")]).unwrap();
//! let record = table.insert_record(buf).unwrap();
//! let fetched = table.get_record(record.rid()).unwrap();
//! assert_eq!(table.value_of(&fetched, "name").unwrap(), Value::from("ab"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod db;
mod field;
mod heap;
mod record;
mod scanner;
mod table;
mod table_meta;

pub use db::Db;
pub use field::FieldMeta;
pub use heap::Heap;
pub use record::{Record, RecordBuf};
pub use scanner::{RecordScanner, ScanMode};
pub use table::Table;
pub use table_meta::{AttrInfo, TableMeta};

pub use tessera_common::types::Rid;
