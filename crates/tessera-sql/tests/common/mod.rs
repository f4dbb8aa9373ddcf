//! Shared helpers for the statement-level integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use tessera_common::{DbError, DbResult, EngineConfig, StatusCode, TrxId, TrxKind};
use tessera_sql::ast::{
    CompOp, ConditionOperand, ConditionSqlNode, CreateTableSqlNode, ExprSqlNode, InsertSqlNode,
    SelectSqlNode, SqlNode,
};
use tessera_sql::Session;
use tessera_storage::{AttrInfo, Db, Record, RecordBuf, Table};
use tessera_txn::{Trx, TrxKit};
use tessera_types::{AttrType, Value};
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Installs a test-writer subscriber once per test binary. `RUST_LOG`
/// overrides the configured filter.
pub fn init_tracing(config: &EngineConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.log_filter))
            .unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

pub fn new_db(kind: TrxKind) -> Arc<Db> {
    let config = EngineConfig::builder()
        .trx_kind(kind)
        .log_filter("warn")
        .build()
        .unwrap();
    init_tracing(&config);
    Arc::new(Db::new("test", config).unwrap())
}

pub fn new_session() -> Session {
    Session::new(new_db(TrxKind::UndoLog))
}

/// Executes `node`, panicking with the session message unless it succeeds.
pub fn run(session: &mut Session, node: SqlNode) {
    let status = session.execute_node(&node);
    assert_eq!(
        status,
        StatusCode::Success,
        "{:?}: {:?}",
        node,
        session.result().message()
    );
}

pub fn create(session: &mut Session, table: &str, attrs: Vec<AttrInfo>) {
    run(
        session,
        SqlNode::CreateTable(CreateTableSqlNode {
            relation: table.into(),
            attrs,
        }),
    );
}

pub fn insert_node(table: &str, rows: Vec<Vec<Value>>) -> SqlNode {
    SqlNode::Insert(InsertSqlNode {
        relation: table.into(),
        rows,
    })
}

/// Creates `T(id INT, name CHAR(4))` holding `rows`.
pub fn create_t(session: &mut Session, rows: &[(i32, &str)]) {
    create(
        session,
        "t",
        vec![AttrInfo::new("id", AttrType::Ints), AttrInfo::chars("name", 4)],
    );
    if !rows.is_empty() {
        run(session, insert_node("t", id_name_rows(rows)));
    }
}

pub fn id_name_rows(rows: &[(i32, &str)]) -> Vec<Vec<Value>> {
    rows.iter()
        .map(|(id, name)| vec![Value::from_int(*id), Value::from(*name)])
        .collect()
}

/// `SELECT * FROM table` rows.
pub fn select_all(session: &mut Session, table: &str) -> Vec<Vec<Value>> {
    run(
        session,
        SqlNode::Select(SelectSqlNode::from(table).select(ExprSqlNode::Star)),
    );
    session.result().rows().to_vec()
}

pub fn eq(field: &str, value: impl Into<Value>) -> ConditionSqlNode {
    ConditionSqlNode::new(
        ConditionOperand::field(field),
        CompOp::Eq,
        ConditionOperand::value(value),
    )
}

/// Wraps a transaction and fails the n-th call (0-based) of a chosen kind.
#[derive(Debug)]
pub struct FaultyTrx {
    inner: Box<dyn Trx>,
    fail_insert_at: Option<usize>,
    fail_update_at: Option<usize>,
    fail_delete_at: Option<usize>,
    inserts: usize,
    updates: usize,
    deletes: usize,
}

impl FaultyTrx {
    pub fn new(kind: TrxKind) -> Self {
        Self {
            inner: TrxKit::new().create(kind),
            fail_insert_at: None,
            fail_update_at: None,
            fail_delete_at: None,
            inserts: 0,
            updates: 0,
            deletes: 0,
        }
    }

    pub fn fail_insert_at(mut self, n: usize) -> Self {
        self.fail_insert_at = Some(n);
        self
    }

    pub fn fail_update_at(mut self, n: usize) -> Self {
        self.fail_update_at = Some(n);
        self
    }

    pub fn fail_delete_at(mut self, n: usize) -> Self {
        self.fail_delete_at = Some(n);
        self
    }
}

fn injected(op: &str, n: usize) -> DbError {
    DbError::storage(format!("injected {op} failure at call {n}"))
}

impl Trx for FaultyTrx {
    fn id(&self) -> TrxId {
        self.inner.id()
    }

    fn insert_record(&mut self, table: &Arc<Table>, buf: RecordBuf) -> DbResult<Record> {
        let n = self.inserts;
        self.inserts += 1;
        if self.fail_insert_at == Some(n) {
            return Err(injected("insert", n));
        }
        self.inner.insert_record(table, buf)
    }

    fn delete_record(&mut self, table: &Arc<Table>, record: &Record) -> DbResult<()> {
        let n = self.deletes;
        self.deletes += 1;
        if self.fail_delete_at == Some(n) {
            return Err(injected("delete", n));
        }
        self.inner.delete_record(table, record)
    }

    fn update_record(
        &mut self,
        table: &Arc<Table>,
        old: &Record,
        new: RecordBuf,
    ) -> DbResult<Record> {
        let n = self.updates;
        self.updates += 1;
        if self.fail_update_at == Some(n) {
            return Err(injected("update", n));
        }
        self.inner.update_record(table, old, new)
    }

    fn commit(&mut self) -> DbResult<()> {
        self.inner.commit()
    }

    fn rollback(&mut self) -> DbResult<()> {
        self.inner.rollback()
    }
}
