//! UPDATE.

use tessera_common::{DbError, DbResult, Rid};
use tessera_storage::{Record, RecordBuf, RecordScanner, ScanMode};
use tessera_txn::{TableTrxExt, Trx};
use tracing::{debug, error};

use super::collect_rids;
use crate::result::SqlResult;
use crate::stmt::UpdateStmt;

/// Progress of an UPDATE.
///
/// Matching RIDs are collected under a read-write scan that is closed before
/// the first row is touched; each row is then re-fetched by RID and
/// rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdatePhase {
    Scanning,
    Collecting,
    Mutating,
    Done,
}

#[derive(Debug)]
struct UpdateRun<'a> {
    stmt: &'a UpdateStmt,
    phase: UpdatePhase,
    scanner: Option<RecordScanner>,
    rids: Vec<Rid>,
    /// `(after, before)` snapshots of every row rewritten so far.
    applied: Vec<(Record, Record)>,
}

impl<'a> UpdateRun<'a> {
    fn new(stmt: &'a UpdateStmt) -> Self {
        Self {
            stmt,
            phase: UpdatePhase::Scanning,
            scanner: None,
            rids: Vec::new(),
            applied: Vec::new(),
        }
    }

    fn step(&mut self, trx: &mut dyn Trx) -> DbResult<()> {
        match self.phase {
            UpdatePhase::Scanning => {
                self.scanner = Some(self.stmt.table().get_record_scanner(ScanMode::ReadWrite));
                self.phase = UpdatePhase::Collecting;
            }
            UpdatePhase::Collecting => {
                let collected = match self.scanner.as_mut() {
                    Some(scanner) => collect_rids(scanner, self.stmt.table(), self.stmt.filter()),
                    None => Err(DbError::internal("update scanner is not open")),
                };
                if let Some(mut scanner) = self.scanner.take() {
                    scanner.close();
                }
                self.rids = collected?;
                debug!(rows = self.rids.len(), "update rows collected");
                self.phase = UpdatePhase::Mutating;
            }
            UpdatePhase::Mutating => {
                if let Err(e) = self.mutate(trx) {
                    self.undo(trx);
                    return Err(e);
                }
                self.phase = UpdatePhase::Done;
            }
            UpdatePhase::Done => {}
        }
        Ok(())
    }

    fn mutate(&mut self, trx: &mut dyn Trx) -> DbResult<()> {
        let table = self.stmt.table();
        let field = self.stmt.field();
        let bytes = self.stmt.value().to_field_bytes();
        for rid in &self.rids {
            let current = table.get_record(*rid)?;
            let mut buf = RecordBuf::from_record(&current);
            buf.write_field(field, &bytes)?;
            let updated = table.update_record_with_trx(trx, &current, buf)?;
            self.applied.push((updated, current));
        }
        Ok(())
    }

    fn undo(&mut self, trx: &mut dyn Trx) {
        let table = self.stmt.table();
        for (updated, before) in self.applied.drain(..).rev() {
            let restore = RecordBuf::from_record(&before);
            if let Err(e) = table.update_record_with_trx(trx, &updated, restore) {
                error!(
                    table = table.name(),
                    rid = %updated.rid(),
                    error = %e,
                    "failed to restore a row of a failed update"
                );
            }
        }
    }
}

pub(super) fn execute(stmt: &UpdateStmt, trx: &mut dyn Trx) -> DbResult<SqlResult> {
    let mut run = UpdateRun::new(stmt);
    while run.phase != UpdatePhase::Done {
        run.step(trx)?;
    }
    Ok(SqlResult::affected(run.applied.len()))
}
