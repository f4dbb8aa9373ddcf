//! # tessera-txn
//!
//! Transaction collaborators for Tessera.
//!
//! Every row mutation an executor performs goes through a [`Trx`]. Two
//! implementations are provided:
//!
//! - [`VacuousTrx`]: applies mutations directly; rollback cannot undo them
//! - [`UndoLogTrx`]: records an undo entry per mutation and replays the log
//!   in reverse on rollback
//!
//! [`TrxKit`] builds either kind from the configured [`TrxKind`] and hands
//! out transaction ids.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tessera_common::config::{EngineConfig, TrxKind};
//! use tessera_storage::{AttrInfo, Db};
//! use tessera_txn::TrxKit;
//! use tessera_types::{AttrType, Value};
//!
//! let db = Db::new("demo", EngineConfig::default()).unwrap();
//! let table = db.create_table("t", &[AttrInfo::new("id", AttrType::Ints)]).unwrap();
//!
//! let kit = TrxKit::new();
//! let mut trx = kit.create(TrxKind::UndoLog);
//! trx.insert_record(&table, table.make_record(&[Value::from_int(1)]).unwrap()).unwrap();
//! trx.rollback().unwrap();
//! assert_eq!(table.record_count(), 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod kit;
mod table_ext;
mod trx;
mod undo_log;
mod vacuous;

pub use kit::TrxKit;
pub use table_ext::TableTrxExt;
pub use trx::Trx;
pub use undo_log::UndoLogTrx;
pub use vacuous::VacuousTrx;

pub use tessera_common::config::TrxKind;
