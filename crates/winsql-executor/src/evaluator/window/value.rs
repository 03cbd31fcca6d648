//! Value window functions
//!
//! Implements LAG, LEAD, FIRST_VALUE, LAST_VALUE and NTH_VALUE for accessing
//! values from other rows in the partition.

use std::ops::Range;

use winsql_types::SqlValue;

use super::partitioning::Partition;

/// Evaluate LAG() value window function
///
/// Returns the value of `column` from (current_row_idx - offset), or
/// `default` when that falls before the partition start. LAG(v, 0) is the
/// current row's own value.
///
/// Example: LAG(price, 1) OVER (ORDER BY date)
pub fn evaluate_lag(
    partition: &Partition,
    current_row_idx: usize,
    column: usize,
    offset: usize,
    default: &SqlValue,
) -> SqlValue {
    match current_row_idx.checked_sub(offset) {
        Some(target_idx) if target_idx < partition.len() => {
            partition.value(target_idx, column).clone()
        }
        _ => default.clone(),
    }
}

/// Evaluate LEAD() value window function
///
/// Returns the value of `column` from (current_row_idx + offset), or
/// `default` when that falls past the partition end.
///
/// Example: LEAD(sales, 3, 0) OVER (PARTITION BY product ORDER BY quarter)
pub fn evaluate_lead(
    partition: &Partition,
    current_row_idx: usize,
    column: usize,
    offset: usize,
    default: &SqlValue,
) -> SqlValue {
    match current_row_idx.checked_add(offset) {
        Some(target_idx) if target_idx < partition.len() => {
            partition.value(target_idx, column).clone()
        }
        _ => default.clone(),
    }
}

/// Evaluate FIRST_VALUE() over a frame; NULL for an empty frame
pub fn evaluate_first_value(partition: &Partition, frame: Range<usize>, column: usize) -> SqlValue {
    if frame.is_empty() {
        return SqlValue::Null;
    }
    partition.value(frame.start, column).clone()
}

/// Evaluate LAST_VALUE() over a frame; NULL for an empty frame
///
/// With the default running frame this is the current row's value, as in SQL.
pub fn evaluate_last_value(partition: &Partition, frame: Range<usize>, column: usize) -> SqlValue {
    if frame.is_empty() {
        return SqlValue::Null;
    }
    partition.value(frame.end - 1, column).clone()
}

/// Evaluate NTH_VALUE() over a frame (`n` is 1-based)
pub fn evaluate_nth_value(
    partition: &Partition,
    frame: Range<usize>,
    column: usize,
    n: usize,
) -> SqlValue {
    match n.checked_sub(1).map(|offset| frame.start + offset) {
        Some(idx) if idx < frame.end => partition.value(idx, column).clone(),
        _ => SqlValue::Null,
    }
}
