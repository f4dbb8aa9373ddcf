//! DELETE.

use tessera_common::DbResult;
use tessera_storage::{Record, RecordBuf, ScanMode};
use tessera_txn::Trx;
use tracing::{debug, error};

use super::collect_rids;
use crate::result::SqlResult;
use crate::stmt::DeleteStmt;

pub(super) fn execute(stmt: &DeleteStmt, trx: &mut dyn Trx) -> DbResult<SqlResult> {
    let table = stmt.table();

    let mut scanner = table.get_record_scanner(ScanMode::ReadWrite);
    let collected = collect_rids(&mut scanner, table, stmt.filter());
    scanner.close();
    let rids = collected?;
    debug!(table = table.name(), rows = rids.len(), "delete rows collected");

    let mut deleted: Vec<Record> = Vec::with_capacity(rids.len());
    for rid in rids {
        let step = table
            .get_record(rid)
            .and_then(|current| trx.delete_record(table, &current).map(|()| current));
        match step {
            Ok(current) => deleted.push(current),
            Err(e) => {
                for image in deleted.iter().rev() {
                    if let Err(undo) = trx.insert_record(table, RecordBuf::from_record(image)) {
                        error!(
                            table = table.name(),
                            rid = %image.rid(),
                            error = %undo,
                            "failed to restore a row of a failed delete"
                        );
                    }
                }
                return Err(e);
            }
        }
    }
    Ok(SqlResult::affected(deleted.len()))
}
