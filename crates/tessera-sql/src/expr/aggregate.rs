//! Aggregate accumulators.

use std::cmp::Ordering;

use tessera_common::{DbError, DbResult};
use tessera_types::{AttrType, Value};

use crate::ast::AggregateFunc;

#[derive(Debug, Clone)]
enum State {
    Count(i64),
    IntSum(Option<i64>),
    FloatSum(Option<f64>),
    Avg { sum: f64, count: i64 },
    Max(Option<Value>),
    Min(Option<Value>),
}

/// Running state of one aggregate over one group.
#[derive(Debug, Clone)]
pub struct Accumulator {
    func: AggregateFunc,
    state: State,
}

impl Accumulator {
    /// Creates an accumulator for `func` over values of `input`.
    pub fn new(func: AggregateFunc, input: AttrType) -> Self {
        let state = match func {
            AggregateFunc::Count => State::Count(0),
            AggregateFunc::Sum if input == AttrType::Ints => State::IntSum(None),
            AggregateFunc::Sum => State::FloatSum(None),
            AggregateFunc::Avg => State::Avg { sum: 0.0, count: 0 },
            AggregateFunc::Max => State::Max(None),
            AggregateFunc::Min => State::Min(None),
        };
        Self { func, state }
    }

    /// Folds one input value in.
    pub fn accumulate(&mut self, value: &Value) -> DbResult<()> {
        match &mut self.state {
            State::Count(count) => *count += 1,
            State::IntSum(sum) => {
                let v = value.as_int().ok_or_else(|| non_numeric(self.func, value))?;
                *sum = Some(sum.unwrap_or(0) + i64::from(v));
            }
            State::FloatSum(sum) => {
                let v = value.as_float().ok_or_else(|| non_numeric(self.func, value))?;
                *sum = Some(sum.unwrap_or(0.0) + f64::from(v));
            }
            State::Avg { sum, count } => {
                let v = value.as_float().ok_or_else(|| non_numeric(self.func, value))?;
                *sum += f64::from(v);
                *count += 1;
            }
            State::Max(best) => keep_if(best, value, Ordering::Greater)?,
            State::Min(best) => keep_if(best, value, Ordering::Less)?,
        }
        Ok(())
    }

    /// Final result, or `None` when the aggregate saw no input and has no
    /// defined value (everything except `COUNT`).
    pub fn evaluate(&self) -> DbResult<Option<Value>> {
        let value = match &self.state {
            State::Count(count) => Some(Value::from_int(i32::try_from(*count).map_err(|_| {
                DbError::invalid_argument("COUNT exceeds the INTS range")
            })?)),
            State::IntSum(sum) => match sum {
                Some(s) => Some(Value::from_int(i32::try_from(*s).map_err(|_| {
                    DbError::invalid_argument("SUM exceeds the INTS range")
                })?)),
                None => None,
            },
            State::FloatSum(sum) => sum.map(|s| Value::from_float(s as f32)),
            State::Avg { sum, count } => {
                (*count > 0).then(|| Value::from_float((*sum / *count as f64) as f32))
            }
            State::Max(best) | State::Min(best) => best.clone(),
        };
        Ok(value)
    }
}

fn keep_if(best: &mut Option<Value>, value: &Value, wanted: Ordering) -> DbResult<()> {
    let replace = match best {
        None => true,
        Some(current) => value.compare(current)? == wanted,
    };
    if replace {
        *best = Some(value.clone());
    }
    Ok(())
}

fn non_numeric(func: AggregateFunc, value: &Value) -> DbError {
    DbError::internal(format!("{func} over non-numeric {}", value.kind()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(func: AggregateFunc, input: AttrType, values: &[Value]) -> Option<Value> {
        let mut acc = Accumulator::new(func, input);
        for v in values {
            acc.accumulate(v).unwrap();
        }
        acc.evaluate().unwrap()
    }

    #[test]
    fn test_numeric_aggregates() {
        let ints: Vec<Value> = [3, 1, 2].into_iter().map(Value::from_int).collect();
        assert_eq!(run(AggregateFunc::Count, AttrType::Ints, &ints), Some(Value::from_int(3)));
        assert_eq!(run(AggregateFunc::Sum, AttrType::Ints, &ints), Some(Value::from_int(6)));
        assert_eq!(run(AggregateFunc::Avg, AttrType::Ints, &ints), Some(Value::from_float(2.0)));
        assert_eq!(run(AggregateFunc::Max, AttrType::Ints, &ints), Some(Value::from_int(3)));
        assert_eq!(run(AggregateFunc::Min, AttrType::Ints, &ints), Some(Value::from_int(1)));
    }

    #[test]
    fn test_min_max_chars() {
        let names: Vec<Value> = ["b", "a", "c"].into_iter().map(Value::from).collect();
        assert_eq!(run(AggregateFunc::Max, AttrType::Chars, &names), Some(Value::from("c")));
        assert_eq!(run(AggregateFunc::Min, AttrType::Chars, &names), Some(Value::from("a")));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(run(AggregateFunc::Count, AttrType::Ints, &[]), Some(Value::from_int(0)));
        assert_eq!(run(AggregateFunc::Sum, AttrType::Ints, &[]), None);
        assert_eq!(run(AggregateFunc::Max, AttrType::Dates, &[]), None);
    }

    #[test]
    fn test_sum_overflow() {
        let mut acc = Accumulator::new(AggregateFunc::Sum, AttrType::Ints);
        acc.accumulate(&Value::from_int(i32::MAX)).unwrap();
        acc.accumulate(&Value::from_int(1)).unwrap();
        assert!(acc.evaluate().is_err());
    }
}
