//! # tessera-sql
//!
//! Statement binding and execution for Tessera.
//!
//! A statement travels through four stages:
//!
//! - **Raw nodes** ([`ast`]): already-parsed statements with unresolved names
//! - **Binding** ([`stmt`]): names resolved against the catalog, literals
//!   coerced to field kinds, producing a [`Stmt`]
//! - **Operators** ([`operator`]): a pull-based tree of physical operators
//! - **Executors** ([`executor`]): run one bound statement through the
//!   session's transaction, undoing their own partial work on failure
//!
//! [`Session`] ties the stages together and holds the [`SqlResult`] of the
//! last statement.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tessera_common::{EngineConfig, StatusCode};
//! use tessera_sql::ast::{
//!     CreateTableSqlNode, ExprSqlNode, InsertSqlNode, SelectSqlNode, SqlNode,
//! };
//! use tessera_sql::Session;
//! use tessera_storage::{AttrInfo, Db};
//! use tessera_types::{AttrType, Value};
//!
//! let db = Arc::new(Db::new("demo", EngineConfig::default()).unwrap());
//! let mut session = Session::new(db);
//!
//! let create = SqlNode::CreateTable(CreateTableSqlNode {
//!     relation: "t".into(),
//!     attrs: vec![AttrInfo::new("id", AttrType::Ints), AttrInfo::chars("name", 4)],
//! });
//! assert_eq!(session.execute_node(&create), StatusCode::Success);
//!
//! let insert = SqlNode::Insert(InsertSqlNode {
//!     relation: "t".into(),
//!     rows: vec![vec![Value::from(1), Value::from("ab")]],
//! });
//! assert_eq!(session.execute_node(&insert), StatusCode::Success);
//!
//! let select = SqlNode::Select(SelectSqlNode::from("t").select(ExprSqlNode::Star));
//! assert_eq!(session.execute_node(&select), StatusCode::Success);
//! assert_eq!(session.result().rows(), &[vec![Value::from(1), Value::from("ab")]]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod executor;
pub mod expr;
pub mod operator;
pub mod result;
pub mod session;
pub mod stmt;

pub use executor::CommandExecutor;
pub use result::SqlResult;
pub use session::Session;
pub use stmt::Stmt;
