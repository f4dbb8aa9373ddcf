//! Nested loop join.

use std::sync::Arc;

use tessera_common::DbResult;
use tessera_txn::Trx;
use tracing::trace;

use super::{BoxedOperator, PhysicalOperator};
use crate::expr::{Expression, Tuple, TupleCellSpec};

/// Joins every left row with every right row, keeping the pairs that
/// satisfy the condition. The right side is materialized at `open`.
#[derive(Debug)]
pub struct NestedLoopJoinOperator {
    left: BoxedOperator,
    right: BoxedOperator,
    condition: Option<Expression>,
    right_rows: Vec<Tuple>,
    right_pos: usize,
    left_row: Option<Tuple>,
    specs: Option<Arc<Vec<TupleCellSpec>>>,
    current: Option<Tuple>,
    done: bool,
}

impl NestedLoopJoinOperator {
    /// Creates a join. Without a condition this is a cross join.
    pub fn new(left: BoxedOperator, right: BoxedOperator, condition: Option<Expression>) -> Self {
        Self {
            left,
            right,
            condition,
            right_rows: Vec::new(),
            right_pos: 0,
            left_row: None,
            specs: None,
            current: None,
            done: false,
        }
    }

    fn advance_left(&mut self) -> DbResult<bool> {
        if !self.left.next()? {
            self.left_row = None;
            return Ok(false);
        }
        self.left_row = self.left.current_tuple().cloned();
        self.right_pos = 0;
        Ok(self.left_row.is_some())
    }
}

impl PhysicalOperator for NestedLoopJoinOperator {
    fn name(&self) -> &'static str {
        "NestedLoopJoin"
    }

    fn open(&mut self, trx: &mut dyn Trx) -> DbResult<()> {
        self.right.open(trx)?;
        self.right_rows.clear();
        let materialized: DbResult<()> = (|| {
            while self.right.next()? {
                if let Some(tuple) = self.right.current_tuple() {
                    self.right_rows.push(tuple.clone());
                }
            }
            Ok(())
        })();
        self.right.close()?;
        materialized?;
        trace!(rows = self.right_rows.len(), "join right side materialized");

        self.left.open(trx)?;
        self.left_row = None;
        self.right_pos = 0;
        self.current = None;
        self.done = false;
        Ok(())
    }

    fn next(&mut self) -> DbResult<bool> {
        if self.done {
            return Ok(false);
        }
        loop {
            if self.left_row.is_none() || self.right_pos >= self.right_rows.len() {
                if !self.advance_left()? {
                    self.done = true;
                    self.current = None;
                    return Ok(false);
                }
                if self.right_rows.is_empty() {
                    continue;
                }
            }

            let Some(left) = self.left_row.as_ref() else {
                continue;
            };
            let right = &self.right_rows[self.right_pos];
            self.right_pos += 1;

            let specs = self
                .specs
                .get_or_insert_with(|| Tuple::joined_specs(left, right));
            let joined = Tuple::join(left, right, Arc::clone(specs));

            let keep = match &self.condition {
                Some(condition) => condition.test(&joined)?,
                None => true,
            };
            if keep {
                self.current = Some(joined);
                return Ok(true);
            }
        }
    }

    fn close(&mut self) -> DbResult<()> {
        self.right_rows.clear();
        self.left_row = None;
        self.current = None;
        self.left.close()
    }

    fn current_tuple(&self) -> Option<&Tuple> {
        self.current.as_ref()
    }
}
