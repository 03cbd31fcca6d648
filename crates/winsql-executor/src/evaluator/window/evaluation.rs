//! Dispatch of bound window calls over a sorted partition

use winsql_types::SqlValue;

use super::{
    aggregates::evaluate_aggregate_window,
    binding::{BoundWindowCall, BoundWindowFunction},
    frames::calculate_frame,
    partitioning::Partition,
    ranking::{
        evaluate_cume_dist, evaluate_dense_rank, evaluate_ntile, evaluate_percent_rank,
        evaluate_rank, evaluate_row_number,
    },
    sorting::SortKey,
    value::{
        evaluate_first_value, evaluate_lag, evaluate_last_value, evaluate_lead,
        evaluate_nth_value,
    },
};

/// Compute one call's value for every row of `partition`, in partition order.
///
/// The partition must already be sorted by `keys`.
pub fn evaluate_window_call(
    partition: &Partition,
    call: &BoundWindowCall,
    keys: &[SortKey],
) -> Vec<SqlValue> {
    let len = partition.len();
    let per_row = |f: &dyn Fn(usize) -> SqlValue| (0..len).map(f).collect::<Vec<_>>();

    match &call.function {
        BoundWindowFunction::RowNumber => evaluate_row_number(partition),
        BoundWindowFunction::Rank => evaluate_rank(partition, keys),
        BoundWindowFunction::DenseRank => evaluate_dense_rank(partition, keys),
        BoundWindowFunction::PercentRank => evaluate_percent_rank(partition, keys),
        BoundWindowFunction::CumeDist => evaluate_cume_dist(partition, keys),
        BoundWindowFunction::Ntile(n) => evaluate_ntile(partition, *n),
        BoundWindowFunction::Lag { column, offset, default } => {
            per_row(&|idx| evaluate_lag(partition, idx, *column, *offset, default))
        }
        BoundWindowFunction::Lead { column, offset, default } => {
            per_row(&|idx| evaluate_lead(partition, idx, *column, *offset, default))
        }
        BoundWindowFunction::FirstValue { column } => per_row(&|idx| {
            evaluate_first_value(partition, calculate_frame(len, idx, &call.frame), *column)
        }),
        BoundWindowFunction::LastValue { column } => per_row(&|idx| {
            evaluate_last_value(partition, calculate_frame(len, idx, &call.frame), *column)
        }),
        BoundWindowFunction::NthValue { column, n } => per_row(&|idx| {
            evaluate_nth_value(partition, calculate_frame(len, idx, &call.frame), *column, *n)
        }),
        BoundWindowFunction::Aggregate { function, column, strict } => {
            evaluate_aggregate_window(partition, *function, *column, &call.frame, *strict)
        }
    }
}
