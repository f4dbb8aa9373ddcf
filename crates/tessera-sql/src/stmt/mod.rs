//! Statement binding.
//!
//! A bound statement is created once from a raw [`SqlNode`] and the
//! catalog, then consumed by exactly one executor run. Every table and
//! field it references has been resolved, and literals compared with or
//! assigned to fields have been cast to the field kinds.

mod binder;
mod create_table;
mod delete;
mod drop_table;
mod filter;
mod insert;
mod join;
mod select;
mod update;

pub use binder::{BinderContext, ExpressionBinder};
pub use create_table::CreateTableStmt;
pub use delete::DeleteStmt;
pub use drop_table::DropTableStmt;
pub use filter::FilterStmt;
pub use insert::InsertStmt;
pub use join::JoinStmt;
pub use select::{OrderByUnit, SelectStmt};
pub use update::UpdateStmt;

use tessera_common::DbResult;
use tessera_storage::Db;

use crate::ast::SqlNode;

/// A bound statement.
#[derive(Debug, Clone)]
pub enum Stmt {
    /// `SELECT`
    Select(SelectStmt),
    /// `INSERT`
    Insert(InsertStmt),
    /// `UPDATE`
    Update(UpdateStmt),
    /// `DELETE`
    Delete(DeleteStmt),
    /// `CREATE TABLE`
    CreateTable(CreateTableStmt),
    /// `DROP TABLE`
    DropTable(DropTableStmt),
}

impl Stmt {
    /// Binds a raw statement against the catalog.
    pub fn create(db: &Db, node: &SqlNode) -> DbResult<Self> {
        Ok(match node {
            SqlNode::Select(n) => Stmt::Select(SelectStmt::create(db, n)?),
            SqlNode::Insert(n) => Stmt::Insert(InsertStmt::create(db, n)?),
            SqlNode::Update(n) => Stmt::Update(UpdateStmt::create(db, n)?),
            SqlNode::Delete(n) => Stmt::Delete(DeleteStmt::create(db, n)?),
            SqlNode::CreateTable(n) => Stmt::CreateTable(CreateTableStmt::create(db, n)?),
            SqlNode::DropTable(n) => Stmt::DropTable(DropTableStmt::create(db, n)?),
        })
    }

    /// Statement kind name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Stmt::Select(_) => "select",
            Stmt::Insert(_) => "insert",
            Stmt::Update(_) => "update",
            Stmt::Delete(_) => "delete",
            Stmt::CreateTable(_) => "create table",
            Stmt::DropTable(_) => "drop table",
        }
    }
}
