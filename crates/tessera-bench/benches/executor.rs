//! Executor benchmarks for Tessera.
//!
//! Benchmarks for:
//! - Batched INSERT through the undo-log transaction
//! - ORDER BY over a materialized table
//! - GROUP BY aggregation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tessera_bench::{generate_rows, insert_users, users_session};
use tessera_sql::ast::{AggregateFunc, ExprSqlNode, SelectSqlNode, SqlNode};

fn bench_batch_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("executor/insert");

    for size in [100, 1000, 10_000].iter() {
        let rows = generate_rows(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut session = users_session();
                let status = session.execute_node(&insert_users(rows.clone()));
                black_box(status)
            });
        });
    }

    group.finish();
}

fn bench_order_by(c: &mut Criterion) {
    let mut group = c.benchmark_group("executor/order_by");

    for size in [1000, 10_000].iter() {
        let mut session = users_session();
        session.execute_node(&insert_users(generate_rows(*size)));
        let select = SqlNode::Select(
            SelectSqlNode::from("users")
                .select(ExprSqlNode::Star)
                .order_by(ExprSqlNode::field("age"), true)
                .order_by(ExprSqlNode::field("name"), false),
        );

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(session.execute_node(&select)));
        });
    }

    group.finish();
}

fn bench_group_by(c: &mut Criterion) {
    let mut session = users_session();
    session.execute_node(&insert_users(generate_rows(10_000)));
    let select = SqlNode::Select(
        SelectSqlNode::from("users")
            .select(ExprSqlNode::field("age"))
            .select(ExprSqlNode::aggregate(AggregateFunc::Count, ExprSqlNode::Star))
            .select(ExprSqlNode::aggregate(
                AggregateFunc::Avg,
                ExprSqlNode::field("id"),
            ))
            .group_by(ExprSqlNode::field("age")),
    );

    c.bench_function("executor/group_by_age", |b| {
        b.iter(|| black_box(session.execute_node(&select)));
    });
}

criterion_group!(benches, bench_batch_insert, bench_order_by, bench_group_by);
criterion_main!(benches);
