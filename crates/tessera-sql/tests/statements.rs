//! Whole statements driven through a session.

mod common;

use common::*;
use tessera_common::StatusCode;
use tessera_sql::ast::{
    AggregateFunc, CompOp, ConditionOperand, ConditionSqlNode, DeleteSqlNode, DropTableSqlNode,
    ExprSqlNode, SelectSqlNode, SqlNode, UpdateSqlNode,
};
use tessera_storage::AttrInfo;
use tessera_types::{AttrType, Value};

fn update(table: &str, field: &str, value: impl Into<Value>, conditions: Vec<ConditionSqlNode>) -> SqlNode {
    SqlNode::Update(UpdateSqlNode {
        relation: table.into(),
        attribute: field.into(),
        value: value.into(),
        conditions,
    })
}

fn rows(session: &tessera_sql::Session) -> Vec<Vec<Value>> {
    session.result().rows().to_vec()
}

#[test]
fn test_update_char_field() {
    let mut session = new_session();
    create_t(&mut session, &[(1, "ab"), (2, "cd")]);

    run(&mut session, update("t", "name", "wxyz", vec![eq("id", 1)]));
    assert_eq!(session.result().affected_rows(), Some(1));
    assert_eq!(
        select_all(&mut session, "t"),
        id_name_rows(&[(1, "wxyz"), (2, "cd")])
    );
}

#[test]
fn test_update_truncates_to_field_width() {
    let mut session = new_session();
    create(
        &mut session,
        "p",
        vec![
            AttrInfo::new("id", AttrType::Ints),
            AttrInfo::chars("code", 4),
            AttrInfo::new("qty", AttrType::Ints),
        ],
    );
    run(
        &mut session,
        insert_node("p", vec![vec![Value::from(1), Value::from("aa"), Value::from(77)]]),
    );

    run(&mut session, update("p", "code", "abcdefgh", vec![]));
    assert_eq!(
        select_all(&mut session, "p"),
        vec![vec![Value::from(1), Value::from("abcd"), Value::from(77)]]
    );
}

#[test]
fn test_update_casts_value_to_field_kind() {
    let mut session = new_session();
    create(
        &mut session,
        "d",
        vec![AttrInfo::new("id", AttrType::Ints), AttrInfo::new("day", AttrType::Dates)],
    );
    run(
        &mut session,
        insert_node("d", vec![vec![Value::from(1), Value::from("2024-01-31")]]),
    );

    run(&mut session, update("d", "day", "2024-2-29", vec![]));
    assert_eq!(
        select_all(&mut session, "d"),
        vec![vec![Value::from(1), Value::from_date(20240229)]]
    );

    let status = session.execute_node(&update("d", "day", "2023-02-29", vec![]));
    assert_eq!(status, StatusCode::InvalidArgument);
    let status = session.execute_node(&update("d", "day", true, vec![]));
    assert_eq!(status, StatusCode::SchemaFieldTypeMismatch);
}

#[test]
fn test_string_literals_parse_into_scalar_fields() {
    let mut session = new_session();
    create(
        &mut session,
        "f",
        vec![
            AttrInfo::new("id", AttrType::Ints),
            AttrInfo::new("ok", AttrType::Booleans),
            AttrInfo::new("score", AttrType::Floats),
        ],
    );
    run(
        &mut session,
        insert_node(
            "f",
            vec![
                vec![Value::from("1"), Value::from("false"), Value::from("1.5")],
                vec![Value::from(2), Value::from(false), Value::from(2.25f32)],
            ],
        ),
    );

    run(&mut session, update("f", "ok", "true", vec![eq("score", "1.5")]));
    assert_eq!(
        select_all(&mut session, "f"),
        vec![
            vec![Value::from(1), Value::from(true), Value::from(1.5f32)],
            vec![Value::from(2), Value::from(false), Value::from(2.25f32)],
        ]
    );

    let status = session.execute_node(&update("f", "ok", "maybe", vec![]));
    assert_eq!(status, StatusCode::InvalidArgument);
}

#[test]
fn test_order_by_desc_then_asc() {
    let mut session = new_session();
    create_t(&mut session, &[(3, "a"), (1, "b"), (2, "a")]);

    let select = SelectSqlNode::from("t")
        .select(ExprSqlNode::Star)
        .order_by(ExprSqlNode::field("name"), true)
        .order_by(ExprSqlNode::field("id"), false);
    run(&mut session, SqlNode::Select(select));
    assert_eq!(rows(&session), id_name_rows(&[(1, "b"), (2, "a"), (3, "a")]));
}

#[test]
fn test_drop_missing_table_leaves_catalog() {
    let mut session = new_session();
    create_t(&mut session, &[]);
    let before = session.db().table_names();

    let status = session.execute_node(&SqlNode::DropTable(DropTableSqlNode {
        relation: "missing".into(),
    }));
    assert_eq!(status, StatusCode::SchemaTableNotExist);
    assert_eq!(session.result().status(), StatusCode::SchemaTableNotExist);
    assert_eq!(session.db().table_names(), before);
}

#[test]
fn test_insert_bad_row_inserts_nothing() {
    let mut session = new_session();
    create_t(&mut session, &[]);

    let mut batch = id_name_rows(&[(1, "a"), (2, "b")]);
    batch.push(vec![Value::from(3), Value::from(true)]);
    let status = session.execute_node(&insert_node("t", batch));
    assert_eq!(status, StatusCode::SchemaFieldTypeMismatch);
    assert!(select_all(&mut session, "t").is_empty());

    let mut batch = id_name_rows(&[(1, "a")]);
    batch.push(vec![Value::from("x"), Value::from("c")]);
    let status = session.execute_node(&insert_node("t", batch));
    assert_eq!(status, StatusCode::InvalidArgument);
    assert!(select_all(&mut session, "t").is_empty());

    let status = session.execute_node(&insert_node("t", vec![vec![Value::from(1)]]));
    assert_eq!(status, StatusCode::SchemaFieldMissing);

    let status = session.execute_node(&insert_node("t", id_name_rows(&[(1, "toolong")])));
    assert_eq!(status, StatusCode::InvalidArgument);
    assert!(select_all(&mut session, "t").is_empty());
}

#[test]
fn test_unknown_names() {
    let mut session = new_session();
    create_t(&mut session, &[(1, "a")]);

    let select = SelectSqlNode::from("nope").select(ExprSqlNode::Star);
    assert_eq!(
        session.execute_node(&SqlNode::Select(select)),
        StatusCode::SchemaTableNotExist
    );

    let select = SelectSqlNode::from("t").select(ExprSqlNode::field("nope"));
    assert_eq!(
        session.execute_node(&SqlNode::Select(select)),
        StatusCode::SchemaFieldMissing
    );

    let status = session.execute_node(&update("t", "nope", 1, vec![]));
    assert_eq!(status, StatusCode::SchemaFieldMissing);
}

#[test]
fn test_where_coerces_literal() {
    let mut session = new_session();
    create(
        &mut session,
        "d",
        vec![AttrInfo::new("id", AttrType::Ints), AttrInfo::new("day", AttrType::Dates)],
    );
    run(
        &mut session,
        insert_node(
            "d",
            vec![
                vec![Value::from(1), Value::from("2024-02-28")],
                vec![Value::from(2), Value::from("2024-02-29")],
                vec![Value::from(3), Value::from("2024-03-01")],
            ],
        ),
    );

    let select = SelectSqlNode::from("d")
        .select(ExprSqlNode::field("id"))
        .filter(ConditionSqlNode::new(
            ConditionOperand::field("day"),
            CompOp::Ge,
            ConditionOperand::value("2024-02-29"),
        ));
    run(&mut session, SqlNode::Select(select));
    assert_eq!(rows(&session), vec![vec![Value::from(2)], vec![Value::from(3)]]);
}

fn create_orders(session: &mut tessera_sql::Session) {
    create_t(session, &[(1, "ann"), (2, "bob"), (3, "cy")]);
    create(
        session,
        "o",
        vec![AttrInfo::new("uid", AttrType::Ints), AttrInfo::new("amount", AttrType::Ints)],
    );
    run(
        session,
        insert_node(
            "o",
            vec![
                vec![Value::from(1), Value::from(10)],
                vec![Value::from(2), Value::from(5)],
                vec![Value::from(1), Value::from(30)],
            ],
        ),
    );
}

#[test]
fn test_join_on() {
    let mut session = new_session();
    create_orders(&mut session);

    let select = SelectSqlNode::from("t")
        .select(ExprSqlNode::qualified("t", "name"))
        .select(ExprSqlNode::qualified("o", "amount"))
        .join(
            "o",
            vec![ConditionSqlNode::new(
                ConditionOperand::qualified("t", "id"),
                CompOp::Eq,
                ConditionOperand::qualified("o", "uid"),
            )],
        )
        .order_by(ExprSqlNode::qualified("o", "amount"), false);
    run(&mut session, SqlNode::Select(select));

    assert_eq!(session.result().header(), &["t.name", "o.amount"]);
    assert_eq!(
        rows(&session),
        vec![
            vec![Value::from("bob"), Value::from(5)],
            vec![Value::from("ann"), Value::from(10)],
            vec![Value::from("ann"), Value::from(30)],
        ]
    );
}

#[test]
fn test_join_without_conditions_is_rejected() {
    let mut session = new_session();
    create_orders(&mut session);
    let select = SelectSqlNode::from("t").select(ExprSqlNode::Star).join("o", vec![]);
    assert_eq!(
        session.execute_node(&SqlNode::Select(select)),
        StatusCode::InvalidArgument
    );
}

#[test]
fn test_cross_join_with_where() {
    let mut session = new_session();
    create_orders(&mut session);

    let select = SelectSqlNode::from("t")
        .also_from("o")
        .select(ExprSqlNode::Star)
        .filter(ConditionSqlNode::new(
            ConditionOperand::field("id"),
            CompOp::Eq,
            ConditionOperand::field("uid"),
        ))
        .filter(ConditionSqlNode::new(
            ConditionOperand::field("amount"),
            CompOp::Gt,
            ConditionOperand::value(7),
        ));
    run(&mut session, SqlNode::Select(select));
    assert_eq!(
        session.result().header(),
        &["t.id", "t.name", "o.uid", "o.amount"]
    );
    assert_eq!(
        rows(&session),
        vec![
            vec![Value::from(1), Value::from("ann"), Value::from(1), Value::from(10)],
            vec![Value::from(1), Value::from("ann"), Value::from(1), Value::from(30)],
        ]
    );
}

#[test]
fn test_ambiguous_field() {
    let mut session = new_session();
    create_t(&mut session, &[]);
    create(&mut session, "u", vec![AttrInfo::new("id", AttrType::Ints)]);
    let select = SelectSqlNode::from("t")
        .also_from("u")
        .select(ExprSqlNode::field("id"));
    assert_eq!(
        session.execute_node(&SqlNode::Select(select)),
        StatusCode::SchemaFieldAmbiguous
    );
}

#[test]
fn test_group_by_aggregates() {
    let mut session = new_session();
    create(
        &mut session,
        "s",
        vec![AttrInfo::chars("team", 4), AttrInfo::new("score", AttrType::Ints)],
    );
    run(
        &mut session,
        insert_node(
            "s",
            vec![
                vec![Value::from("red"), Value::from(10)],
                vec![Value::from("blue"), Value::from(4)],
                vec![Value::from("red"), Value::from(30)],
            ],
        ),
    );

    let score = || ExprSqlNode::field("score");
    let select = SelectSqlNode::from("s")
        .select(ExprSqlNode::field("team"))
        .select(ExprSqlNode::aggregate(AggregateFunc::Count, ExprSqlNode::Star))
        .select(ExprSqlNode::aggregate(AggregateFunc::Sum, score()))
        .select(ExprSqlNode::aggregate(AggregateFunc::Avg, score()))
        .select(ExprSqlNode::aggregate(AggregateFunc::Max, score()))
        .select(ExprSqlNode::aggregate(AggregateFunc::Min, score()))
        .group_by(ExprSqlNode::field("team"))
        .order_by(ExprSqlNode::field("team"), true);
    run(&mut session, SqlNode::Select(select));

    assert_eq!(
        session.result().header(),
        &["team", "COUNT(*)", "SUM(score)", "AVG(score)", "MAX(score)", "MIN(score)"]
    );
    assert_eq!(
        rows(&session),
        vec![
            vec![
                Value::from("red"),
                Value::from(2),
                Value::from(40),
                Value::from(20.0f32),
                Value::from(30),
                Value::from(10),
            ],
            vec![
                Value::from("blue"),
                Value::from(1),
                Value::from(4),
                Value::from(4.0f32),
                Value::from(4),
                Value::from(4),
            ],
        ]
    );
}

#[test]
fn test_aggregate_over_empty_table() {
    let mut session = new_session();
    create_t(&mut session, &[]);

    let count = SelectSqlNode::from("t")
        .select(ExprSqlNode::aggregate(AggregateFunc::Count, ExprSqlNode::Star));
    run(&mut session, SqlNode::Select(count));
    assert_eq!(rows(&session), vec![vec![Value::from(0)]]);

    let max = SelectSqlNode::from("t")
        .select(ExprSqlNode::aggregate(AggregateFunc::Max, ExprSqlNode::field("id")));
    run(&mut session, SqlNode::Select(max));
    assert!(rows(&session).is_empty());
}

#[test]
fn test_ungrouped_field_with_aggregate() {
    let mut session = new_session();
    create_t(&mut session, &[(1, "a")]);
    let select = SelectSqlNode::from("t")
        .select(ExprSqlNode::field("id"))
        .select(ExprSqlNode::aggregate(AggregateFunc::Count, ExprSqlNode::Star));
    assert_eq!(
        session.execute_node(&SqlNode::Select(select)),
        StatusCode::InvalidArgument
    );

    let select = SelectSqlNode::from("t")
        .select(ExprSqlNode::aggregate(AggregateFunc::Sum, ExprSqlNode::field("name")));
    assert_eq!(
        session.execute_node(&SqlNode::Select(select)),
        StatusCode::SchemaFieldTypeMismatch
    );
}

#[test]
fn test_delete_with_filter() {
    let mut session = new_session();
    create_t(&mut session, &[(1, "a"), (2, "b"), (3, "c")]);

    let delete = SqlNode::Delete(DeleteSqlNode {
        relation: "t".into(),
        conditions: vec![ConditionSqlNode::new(
            ConditionOperand::field("id"),
            CompOp::Ne,
            ConditionOperand::value(2),
        )],
    });
    run(&mut session, delete);
    assert_eq!(session.result().affected_rows(), Some(2));
    assert_eq!(select_all(&mut session, "t"), id_name_rows(&[(2, "b")]));
}
