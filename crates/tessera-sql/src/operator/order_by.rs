//! In-memory sort.

use std::cmp::Ordering;

use tessera_common::DbResult;
use tessera_txn::Trx;
use tessera_types::Value;
use tracing::debug;

use super::{BoxedOperator, PhysicalOperator};
use crate::expr::Tuple;
use crate::stmt::OrderByUnit;

/// Materializes the child and emits its rows sorted by the ORDER BY keys.
///
/// Keys are compared left to right, and the first non-equal key decides.
/// The sort is stable, so rows with equal keys keep their input order.
#[derive(Debug)]
pub struct OrderByOperator {
    child: BoxedOperator,
    units: Vec<OrderByUnit>,
    rows: Vec<Tuple>,
    pos: usize,
    current: Option<Tuple>,
}

impl OrderByOperator {
    /// Creates a sort over `child`.
    pub fn new(child: BoxedOperator, units: Vec<OrderByUnit>) -> Self {
        Self {
            child,
            units,
            rows: Vec::new(),
            pos: 0,
            current: None,
        }
    }

    fn materialize(&mut self) -> DbResult<Vec<(Vec<Value>, Tuple)>> {
        let mut keyed = Vec::new();
        while self.child.next()? {
            let Some(tuple) = self.child.current_tuple() else {
                break;
            };
            let keys = self
                .units
                .iter()
                .map(|u| u.expr.get_value(tuple))
                .collect::<DbResult<Vec<_>>>()?;
            keyed.push((keys, tuple.clone()));
        }
        Ok(keyed)
    }
}

impl PhysicalOperator for OrderByOperator {
    fn name(&self) -> &'static str {
        "OrderBy"
    }

    fn open(&mut self, trx: &mut dyn Trx) -> DbResult<()> {
        self.child.open(trx)?;
        let materialized = self.materialize();
        self.child.close()?;
        let mut keyed = materialized?;

        let mut first_error = None;
        let units = &self.units;
        keyed.sort_by(|(a, _), (b, _)| {
            for (unit, (l, r)) in units.iter().zip(a.iter().zip(b.iter())) {
                let ordering = match l.compare(r) {
                    Ok(ordering) => ordering,
                    Err(e) => {
                        first_error.get_or_insert(e);
                        Ordering::Equal
                    }
                };
                let ordering = if unit.desc { ordering.reverse() } else { ordering };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
        if let Some(e) = first_error {
            return Err(e);
        }

        debug!(rows = keyed.len(), keys = self.units.len(), "sorted");
        self.rows = keyed.into_iter().map(|(_, tuple)| tuple).collect();
        self.pos = 0;
        self.current = None;
        Ok(())
    }

    fn next(&mut self) -> DbResult<bool> {
        if self.pos >= self.rows.len() {
            self.current = None;
            return Ok(false);
        }
        self.current = Some(self.rows[self.pos].clone());
        self.pos += 1;
        Ok(true)
    }

    fn close(&mut self) -> DbResult<()> {
        self.rows.clear();
        self.pos = 0;
        self.current = None;
        Ok(())
    }

    fn current_tuple(&self) -> Option<&Tuple> {
        self.current.as_ref()
    }
}
