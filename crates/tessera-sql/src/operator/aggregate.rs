//! Grouping and aggregation.

use std::cmp::Ordering;
use std::sync::Arc;

use tessera_common::{DbError, DbResult};
use tessera_txn::Trx;
use tessera_types::{AttrType, Value};
use tracing::debug;

use super::{BoxedOperator, PhysicalOperator};
use crate::expr::{Accumulator, Expression, Tuple, TupleCellSpec};

struct Group {
    keys: Vec<Value>,
    accumulators: Vec<Accumulator>,
}

/// Groups the child rows and computes one output row per group.
///
/// Output cells are the GROUP BY keys, under their source specs, followed by
/// one computed cell per aggregate named after the aggregate expression.
/// Without GROUP BY all rows form a single group; on empty input that group
/// is emitted only if every aggregate has a defined value.
#[derive(Debug)]
pub struct AggregateOperator {
    child: BoxedOperator,
    group_by: Vec<Expression>,
    aggregates: Vec<Expression>,
    specs: Arc<Vec<TupleCellSpec>>,
    rows: Vec<Tuple>,
    pos: usize,
    current: Option<Tuple>,
}

impl AggregateOperator {
    /// Creates an aggregation. Every item of `aggregates` must be an
    /// aggregate expression.
    pub fn new(child: BoxedOperator, group_by: Vec<Expression>, aggregates: Vec<Expression>) -> Self {
        let specs = group_by
            .iter()
            .map(|e| match e.as_field() {
                Some(f) => TupleCellSpec::new(f.table().name(), f.field().name()),
                None => TupleCellSpec::computed(e.name()),
            })
            .chain(aggregates.iter().map(|e| TupleCellSpec::computed(e.name())))
            .collect();
        Self {
            child,
            group_by,
            aggregates,
            specs: Arc::new(specs),
            rows: Vec::new(),
            pos: 0,
            current: None,
        }
    }

    fn new_accumulators(&self) -> DbResult<Vec<Accumulator>> {
        self.aggregates
            .iter()
            .map(|e| match e {
                Expression::Aggregate { func, child } => Ok(Accumulator::new(
                    *func,
                    child.as_ref().map_or(AttrType::Ints, |c| c.value_type()),
                )),
                other => Err(DbError::internal(format!(
                    "{} is not an aggregate",
                    other.name()
                ))),
            })
            .collect()
    }

    fn build_groups(&mut self) -> DbResult<Vec<Group>> {
        let mut groups: Vec<Group> = Vec::new();
        if self.group_by.is_empty() {
            groups.push(Group {
                keys: Vec::new(),
                accumulators: self.new_accumulators()?,
            });
        }

        let count_star = Value::from_bool(true);
        while self.child.next()? {
            let Some(tuple) = self.child.current_tuple() else {
                break;
            };
            let keys = self
                .group_by
                .iter()
                .map(|e| e.get_value(tuple))
                .collect::<DbResult<Vec<_>>>()?;

            let mut found = None;
            for (i, group) in groups.iter().enumerate() {
                if same_keys(&group.keys, &keys)? {
                    found = Some(i);
                    break;
                }
            }
            let index = match found {
                Some(i) => i,
                None => {
                    groups.push(Group {
                        keys,
                        accumulators: self.new_accumulators()?,
                    });
                    groups.len() - 1
                }
            };

            let group = &mut groups[index];
            for (expr, acc) in self.aggregates.iter().zip(group.accumulators.iter_mut()) {
                match expr {
                    Expression::Aggregate { child: Some(child), .. } => {
                        acc.accumulate(&child.get_value(tuple)?)?
                    }
                    _ => acc.accumulate(&count_star)?,
                }
            }
        }
        Ok(groups)
    }
}

fn same_keys(a: &[Value], b: &[Value]) -> DbResult<bool> {
    for (l, r) in a.iter().zip(b) {
        if l.compare(r)? != Ordering::Equal {
            return Ok(false);
        }
    }
    Ok(true)
}

impl PhysicalOperator for AggregateOperator {
    fn name(&self) -> &'static str {
        "Aggregate"
    }

    fn open(&mut self, trx: &mut dyn Trx) -> DbResult<()> {
        self.child.open(trx)?;
        let grouped = self.build_groups();
        self.child.close()?;
        let groups = grouped?;

        let group_count = groups.len();
        self.rows.clear();
        'groups: for group in groups {
            let mut cells = group.keys;
            for acc in &group.accumulators {
                match acc.evaluate()? {
                    Some(value) => cells.push(value),
                    None => continue 'groups,
                }
            }
            self.rows.push(Tuple::new(Arc::clone(&self.specs), cells));
        }
        debug!(groups = group_count, rows = self.rows.len(), "aggregated");
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
