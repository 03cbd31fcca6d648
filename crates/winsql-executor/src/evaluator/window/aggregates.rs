//! Aggregate window functions
//!
//! Implements COUNT, SUM, AVG, MIN, MAX with frame support. Running frames
//! accumulate incrementally, whole-partition frames are computed once, and
//! everything else folds its frame from scratch.

use std::{cmp::Ordering, ops::Range};

use winsql_ast::{AggregateFunction, FrameSpec};
use winsql_types::SqlValue;

use super::{
    frames::{calculate_frame, nominal_width},
    partitioning::Partition,
    sorting::compare_values,
};

/// Running sum that stays INTEGER until it overflows or meets a NUMERIC
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Sum {
    Empty,
    Integer(i64),
    Numeric(f64),
}

impl Sum {
    fn add(self, value: &SqlValue) -> Sum {
        match (self, value) {
            (Sum::Empty, SqlValue::Integer(v)) => Sum::Integer(*v),
            (Sum::Integer(acc), SqlValue::Integer(v)) => {
                acc.checked_add(*v).map_or(Sum::Numeric(acc as f64 + *v as f64), Sum::Integer)
            }
            (acc, value) => match value.as_f64() {
                Some(v) => Sum::Numeric(acc.as_f64() + v),
                None => acc,
            },
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Sum::Empty => 0.0,
            Sum::Integer(v) => v as f64,
            Sum::Numeric(v) => v,
        }
    }

    fn into_value(self) -> SqlValue {
        match self {
            Sum::Empty => SqlValue::Null,
            Sum::Integer(v) => SqlValue::Integer(v),
            Sum::Numeric(v) => SqlValue::Numeric(v),
        }
    }
}

/// Accumulator for aggregate functions
///
/// NULL inputs are ignored by everything except COUNT(*). Over no
/// non-NULL input, COUNT yields 0 and the others yield NULL.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Accumulator {
    Count { count: i64 },
    CountStar { count: i64 },
    Sum { sum: Sum },
    Avg { sum: f64, count: i64 },
    Min { value: Option<SqlValue> },
    Max { value: Option<SqlValue> },
}

impl Accumulator {
    pub fn new(function: AggregateFunction) -> Self {
        match function {
            AggregateFunction::Count => Accumulator::Count { count: 0 },
            AggregateFunction::CountStar => Accumulator::CountStar { count: 0 },
            AggregateFunction::Sum => Accumulator::Sum { sum: Sum::Empty },
            AggregateFunction::Avg => Accumulator::Avg { sum: 0.0, count: 0 },
            AggregateFunction::Min => Accumulator::Min { value: None },
            AggregateFunction::Max => Accumulator::Max { value: None },
        }
    }

    /// Feed one row's value (ignored by COUNT(*), which only counts rows)
    pub fn accumulate(&mut self, value: &SqlValue) {
        if let Accumulator::CountStar { count } = self {
            *count += 1;
            return;
        }
        if value.is_null() {
            return;
        }

        match self {
            Accumulator::Count { count } => *count += 1,
            Accumulator::CountStar { .. } => {}
            Accumulator::Sum { sum } => *sum = sum.add(value),
            Accumulator::Avg { sum, count } => {
                if let Some(v) = value.as_f64() {
                    *sum += v;
                    *count += 1;
                }
            }
            Accumulator::Min { value: current } => {
                if current.as_ref().map_or(true, |c| compare_values(value, c) == Ordering::Less) {
                    *current = Some(value.clone());
                }
            }
            Accumulator::Max { value: current } => {
                if current.as_ref().map_or(true, |c| compare_values(value, c) == Ordering::Greater) {
                    *current = Some(value.clone());
                }
            }
        }
    }

    pub fn finish(&self) -> SqlValue {
        match self {
            Accumulator::Count { count } | Accumulator::CountStar { count } => {
                SqlValue::Integer(*count)
            }
            Accumulator::Sum { sum } => sum.into_value(),
            Accumulator::Avg { sum, count } => {
                if *count == 0 {
                    SqlValue::Null
                } else {
                    SqlValue::Numeric(sum / *count as f64)
                }
            }
            Accumulator::Min { value } | Accumulator::Max { value } => {
                value.clone().unwrap_or(SqlValue::Null)
            }
        }
    }
}

/// Fold one aggregate over a frame of the partition
///
/// `column` is `None` only for COUNT(*).
pub fn evaluate_aggregate_over(
    partition: &Partition,
    frame: Range<usize>,
    function: AggregateFunction,
    column: Option<usize>,
) -> SqlValue {
    let mut acc = Accumulator::new(function);
    for idx in frame {
        if idx >= partition.len() {
            break;
        }
        match column {
            Some(column) => acc.accumulate(partition.value(idx, column)),
            None => acc.accumulate(&SqlValue::Null),
        }
    }
    acc.finish()
}

/// Evaluate an aggregate window function for every row of a sorted partition
///
/// With `strict`, rows whose fixed-width frame is clipped by the partition
/// edge get NULL instead of an aggregate over the shorter frame.
pub fn evaluate_aggregate_window(
    partition: &Partition,
    function: AggregateFunction,
    column: Option<usize>,
    frame: &FrameSpec,
    strict: bool,
) -> Vec<SqlValue> {
    let len = partition.len();
    let value_at = |idx: usize| match column {
        Some(column) => partition.value(idx, column),
        None => &SqlValue::Null,
    };

    match frame {
        FrameSpec::Whole => {
            let result = evaluate_aggregate_over(partition, 0..len, function, column);
            vec![result; len]
        }
        FrameSpec::Running => {
            let mut acc = Accumulator::new(function);
            (0..len)
                .map(|idx| {
                    acc.accumulate(value_at(idx));
                    acc.finish()
                })
                .collect()
        }
        _ => {
            let width = if strict { nominal_width(frame) } else { None };
            (0..len)
                .map(|idx| {
                    let range = calculate_frame(len, idx, frame);
                    match width {
                        Some(width) if range.len() < width => SqlValue::Null,
                        _ => evaluate_aggregate_over(partition, range, function, column),
                    }
                })
                .collect()
        }
    }
}
