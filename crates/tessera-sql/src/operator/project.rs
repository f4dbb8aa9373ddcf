//! Projection onto the select list.

use std::sync::Arc;

use tessera_common::DbResult;
use tessera_txn::Trx;

use super::{BoxedOperator, PhysicalOperator};
use crate::expr::{Expression, Tuple, TupleCellSpec};

/// Evaluates the select list against each child row.
#[derive(Debug)]
pub struct ProjectOperator {
    child: BoxedOperator,
    exprs: Vec<Expression>,
    specs: Arc<Vec<TupleCellSpec>>,
    current: Option<Tuple>,
}

impl ProjectOperator {
    /// Creates a projection. Output cells are named after the expressions.
    pub fn new(child: BoxedOperator, exprs: Vec<Expression>) -> Self {
        let specs = Arc::new(
            exprs
                .iter()
                .map(|e| TupleCellSpec::computed(e.name()))
                .collect(),
        );
        Self {
            child,
            exprs,
            specs,
            current: None,
        }
    }

    /// Column headers.
    pub fn header(&self) -> Vec<String> {
        self.specs.iter().map(|s| s.field.clone()).collect()
    }
}

impl PhysicalOperator for ProjectOperator {
    fn name(&self) -> &'static str {
        "Project"
    }

    fn open(&mut self, trx: &mut dyn Trx) -> DbResult<()> {
        self.current = None;
        self.child.open(trx)
    }

    fn next(&mut self) -> DbResult<bool> {
        if !self.child.next()? {
            self.current = None;
            return Ok(false);
        }
        let Some(input) = self.child.current_tuple() else {
            self.current = None;
            return Ok(false);
        };
        let cells = self
            .exprs
            .iter()
            .map(|e| e.get_value(input))
            .collect::<DbResult<Vec<_>>>()?;
        self.current = Some(Tuple::new(Arc::clone(&self.specs), cells));
        Ok(true)
    }

    fn close(&mut self) -> DbResult<()> {
        self.current = None;
        self.child.close()
    }

    fn current_tuple(&self) -> Option<&Tuple> {
        self.current.as_ref()
    }
}
