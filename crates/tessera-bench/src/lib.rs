//! Tessera benchmarks.
//!
//! Benchmarks cover the blocking sort and batched inserts:
//!
//! ```bash
//! cargo bench -p tessera-bench
//! ```

use std::sync::{Arc, Once};

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tessera_common::EngineConfig;
use tessera_sql::ast::{CreateTableSqlNode, InsertSqlNode, SqlNode};
use tessera_sql::Session;
use tessera_storage::{AttrInfo, Db};
use tessera_types::{AttrType, Value};
use tracing_subscriber::EnvFilter;

/// Width of the `name` column of the benchmark table.
pub const NAME_WIDTH: usize = 8;

static LOGGING: Once = Once::new();

/// Builds the subscriber filter from `config.log_filter`, falling back to `info`.
pub fn log_filter(config: &EngineConfig) -> EnvFilter {
    EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber once per process.
pub fn init_logging(config: &EngineConfig) {
    LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(log_filter(config))
            .with_target(true)
            .try_init();
    });
}

/// Generates a random alphanumeric string.
pub fn random_string(rng: &mut StdRng, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generates `(id, name, age)` rows from a fixed seed.
pub fn generate_rows(count: usize) -> Vec<Vec<Value>> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|i| {
            let id = i32::try_from(i).unwrap_or(i32::MAX);
            let name = random_string(&mut rng, NAME_WIDTH);
            let age: i32 = rng.gen_range(18..80);
            vec![Value::from(id), Value::from(name.as_str()), Value::from(age)]
        })
        .collect()
}

/// A session over a fresh database holding `users(id, name, age)`.
pub fn users_session() -> Session {
    let config = EngineConfig::builder()
        .log_filter("warn")
        .build()
        .expect("Failed to build config");
    init_logging(&config);
    let db = Db::new("bench", config).expect("Failed to create database");
    let mut session = Session::new(Arc::new(db));
    session.execute_node(&SqlNode::CreateTable(CreateTableSqlNode {
        relation: "users".into(),
        attrs: vec![
            AttrInfo::new("id", AttrType::Ints),
            AttrInfo::chars("name", NAME_WIDTH),
            AttrInfo::new("age", AttrType::Ints),
        ],
    }));
    session
}

/// An INSERT of `rows` into `users`.
pub fn insert_users(rows: Vec<Vec<Value>>) -> SqlNode {
    SqlNode::Insert(InsertSqlNode {
        relation: "users".into(),
        rows,
    })
}
