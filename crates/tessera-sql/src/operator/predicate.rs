//! Row filter.

use tessera_common::DbResult;
use tessera_txn::Trx;

use super::{BoxedOperator, PhysicalOperator};
use crate::expr::{Expression, Tuple};

/// Passes through the child rows for which the predicate holds.
#[derive(Debug)]
pub struct PredicateOperator {
    child: BoxedOperator,
    predicate: Expression,
}

impl PredicateOperator {
    /// Creates a filter over `child`.
    pub fn new(child: BoxedOperator, predicate: Expression) -> Self {
        Self { child, predicate }
    }
}

impl PhysicalOperator for PredicateOperator {
    fn name(&self) -> &'static str {
        "Predicate"
    }

    fn open(&mut self, trx: &mut dyn Trx) -> DbResult<()> {
        self.child.open(trx)
    }

    fn next(&mut self) -> DbResult<bool> {
        while self.child.next()? {
            if let Some(tuple) = self.child.current_tuple() {
                if self.predicate.test(tuple)? {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn close(&mut self) -> DbResult<()> {
        self.child.close()
    }

    fn current_tuple(&self) -> Option<&Tuple> {
        self.child.current_tuple()
    }
}
