//! Statement-level all-or-nothing behavior under injected failures.

mod common;

use common::*;
use tessera_common::{StatusCode, TrxKind};
use tessera_sql::ast::{DeleteSqlNode, SqlNode, UpdateSqlNode};
use tessera_sql::Session;
use tessera_storage::AttrInfo;
use tessera_types::{AttrType, Value};

fn faulty_session(kind: TrxKind, trx: FaultyTrx) -> Session {
    let mut session = Session::with_trx(new_db(kind), Box::new(trx));
    create_t(&mut session, &[]);
    session
}

#[test]
fn test_insert_failure_at_each_row_leaves_no_rows() {
    let batch = [(1, "a"), (2, "b"), (3, "c"), (4, "d")];
    for kind in [TrxKind::Vacuous, TrxKind::UndoLog] {
        for k in 0..batch.len() {
            let mut session = faulty_session(kind, FaultyTrx::new(kind).fail_insert_at(k));
            let status = session.execute_node(&insert_node("t", id_name_rows(&batch)));
            assert_eq!(status, StatusCode::Storage, "kind {kind}, row {k}");
            assert!(session.result().message().is_some());
            assert!(
                select_all(&mut session, "t").is_empty(),
                "kind {kind}, row {k}"
            );
        }
    }
}

#[test]
fn test_insert_failure_with_failing_undo_reports_primary_error() {
    let batch = [(1, "a"), (2, "b"), (3, "c"), (4, "d")];
    for kind in [TrxKind::Vacuous, TrxKind::UndoLog] {
        let trx = FaultyTrx::new(kind).fail_insert_at(2).fail_delete_at(0);
        let mut session = faulty_session(kind, trx);

        let status = session.execute_node(&insert_node("t", id_name_rows(&batch)));
        assert_eq!(status, StatusCode::Storage, "kind {kind}");
        let message = session.result().message().unwrap_or_default().to_string();
        assert!(message.contains("insert failure at call 2"), "{message}");
        assert!(!message.contains("delete"), "{message}");

        // The undo log still removes the row the statement could not.
        let expected = match kind {
            TrxKind::Vacuous => id_name_rows(&[(2, "b")]),
            TrxKind::UndoLog => vec![],
        };
        assert_eq!(select_all(&mut session, "t"), expected, "kind {kind}");
    }
}

#[test]
fn test_update_failure_restores_earlier_rows() {
    let original = [(1, "a"), (2, "b"), (3, "c")];
    for kind in [TrxKind::Vacuous, TrxKind::UndoLog] {
        let mut session = faulty_session(kind, FaultyTrx::new(kind).fail_update_at(2));
        run(&mut session, insert_node("t", id_name_rows(&original)));

        let status = session.execute_node(&SqlNode::Update(UpdateSqlNode {
            relation: "t".into(),
            attribute: "name".into(),
            value: Value::from("zz"),
            conditions: vec![],
        }));
        assert_eq!(status, StatusCode::Storage);
        assert_eq!(select_all(&mut session, "t"), id_name_rows(&original));
    }
}

#[test]
fn test_delete_failure_restores_earlier_rows() {
    let original = [(1, "a"), (2, "b"), (3, "c")];
    for kind in [TrxKind::Vacuous, TrxKind::UndoLog] {
        let mut session = faulty_session(kind, FaultyTrx::new(kind).fail_delete_at(1));
        run(&mut session, insert_node("t", id_name_rows(&original)));

        let status = session.execute_node(&SqlNode::Delete(DeleteSqlNode {
            relation: "t".into(),
            conditions: vec![],
        }));
        assert_eq!(status, StatusCode::Storage);

        let mut rows = select_all(&mut session, "t");
        rows.sort_by_key(|r| r[0].as_int());
        assert_eq!(rows, id_name_rows(&original));
    }
}

#[test]
fn test_explicit_rollback_with_undo_log() {
    let mut session = Session::new(new_db(TrxKind::UndoLog));
    create_t(&mut session, &[(1, "keep")]);

    session.set_autocommit(false);
    run(&mut session, insert_node("t", id_name_rows(&[(2, "b"), (3, "c")])));
    run(
        &mut session,
        SqlNode::Update(UpdateSqlNode {
            relation: "t".into(),
            attribute: "name".into(),
            value: Value::from("new"),
            conditions: vec![eq("id", 1)],
        }),
    );
    run(
        &mut session,
        SqlNode::Delete(DeleteSqlNode {
            relation: "t".into(),
            conditions: vec![eq("id", 2)],
        }),
    );
    assert_eq!(select_all(&mut session, "t").len(), 2);

    session.rollback().unwrap();
    assert_eq!(select_all(&mut session, "t"), id_name_rows(&[(1, "keep")]));
}

#[test]
fn test_commit_keeps_changes() {
    let mut session = Session::new(new_db(TrxKind::UndoLog));
    create(&mut session, "n", vec![AttrInfo::new("v", AttrType::Ints)]);

    session.set_autocommit(false);
    run(&mut session, insert_node("n", vec![vec![Value::from(5)]]));
    session.commit().unwrap();
    session.rollback().unwrap();
    assert_eq!(select_all(&mut session, "n"), vec![vec![Value::from(5)]]);
}
