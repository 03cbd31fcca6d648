//! Window Function Evaluator
//!
//! This module implements the core window function evaluation engine that:
//! - Partitions rows by PARTITION BY columns
//! - Sorts partitions by ORDER BY items
//! - Calculates frame boundaries (ROWS mode)
//! - Evaluates window functions over frames
//!
//! # Module Organization
//!
//! - `partitioning` - Partition management and row grouping
//! - `sorting` - Partition sorting and value comparison
//! - `frames` - Frame validation and boundary calculation
//! - `ranking` - ROW_NUMBER, RANK, DENSE_RANK, NTILE, PERCENT_RANK, CUME_DIST
//! - `aggregates` - COUNT, SUM, AVG, MIN, MAX over frames
//! - `value` - LAG, LEAD, FIRST_VALUE, LAST_VALUE, NTH_VALUE
//! - `binding` - Call validation against a schema
//! - `evaluation` - Dispatch of bound calls

mod aggregates;
mod binding;
mod evaluation;
mod frames;
mod partitioning;
mod ranking;
mod sorting;
mod value;

pub(crate) use aggregates::Accumulator;
pub use aggregates::{evaluate_aggregate_over, evaluate_aggregate_window};
pub use binding::{bind_window_call, BoundWindowCall, BoundWindowFunction};
pub use evaluation::evaluate_window_call;
pub use frames::{calculate_frame, nominal_width, resolve_frame, validate_frame};
pub use partitioning::{partition_relation, partition_rows, Partition};
pub use ranking::{
    evaluate_cume_dist, evaluate_dense_rank, evaluate_ntile, evaluate_percent_rank, evaluate_rank,
    evaluate_row_number,
};
pub use sorting::{
    compare_rows, compare_values, is_peer, resolve_sort_keys, sort_partition, SortKey,
};
pub use value::{
    evaluate_first_value, evaluate_lag, evaluate_last_value, evaluate_lead, evaluate_nth_value,
};

#[cfg(test)]
mod tests;
