//! Ranking window functions
//!
//! Implements ROW_NUMBER, RANK, DENSE_RANK, NTILE, PERCENT_RANK and CUME_DIST.
//! All of them expect the partition to be sorted by `keys` already.

use winsql_types::SqlValue;

use super::{
    partitioning::Partition,
    sorting::{is_peer, SortKey},
};

/// Evaluate ROW_NUMBER() window function
///
/// Returns unique sequential integers starting from 1 for each row in the partition.
/// Ties keep their input order, so numbering is deterministic.
///
/// Example: [1, 2, 3, 4, 5] regardless of duplicate values
pub fn evaluate_row_number(partition: &Partition) -> Vec<SqlValue> {
    (1..=partition.len()).map(|n| SqlValue::Integer(n as i64)).collect()
}

/// Start position of each row's peer group
fn peer_group_starts(partition: &Partition, keys: &[SortKey]) -> Vec<usize> {
    let mut starts = Vec::with_capacity(partition.len());
    let mut current_start = 0;
    for idx in 0..partition.len() {
        if idx > 0 && !is_peer(partition.rows[idx - 1], partition.rows[idx], keys) {
            current_start = idx;
        }
        starts.push(current_start);
    }
    starts
}

/// Evaluate RANK() window function
///
/// Rows with equal ORDER BY values get the same rank; the next rank after a
/// tie skips numbers.
///
/// Example for scores [95, 90, 90, 85]: ranks are [1, 2, 2, 4]
pub fn evaluate_rank(partition: &Partition, keys: &[SortKey]) -> Vec<SqlValue> {
    if keys.is_empty() {
        // Without ORDER BY, all rows are peers
        return vec![SqlValue::Integer(1); partition.len()];
    }

    peer_group_starts(partition, keys)
        .into_iter()
        .map(|start| SqlValue::Integer(start as i64 + 1))
        .collect()
}

/// Evaluate DENSE_RANK() window function
///
/// Like RANK but without gaps.
///
/// Example for scores [95, 90, 90, 85]: ranks are [1, 2, 2, 3]
pub fn evaluate_dense_rank(partition: &Partition, keys: &[SortKey]) -> Vec<SqlValue> {
    if keys.is_empty() {
        return vec![SqlValue::Integer(1); partition.len()];
    }

    let mut ranks = Vec::with_capacity(partition.len());
    let mut current_rank = 1i64;

    for idx in 0..partition.len() {
        if idx > 0 && !is_peer(partition.rows[idx - 1], partition.rows[idx], keys) {
            current_rank += 1;
        }
        ranks.push(SqlValue::Integer(current_rank));
    }

    ranks
}

/// Evaluate PERCENT_RANK() window function
///
/// `(rank - 1) / (rows - 1)`, and 0 for a single-row partition.
pub fn evaluate_percent_rank(partition: &Partition, keys: &[SortKey]) -> Vec<SqlValue> {
    let total = partition.len();
    if total <= 1 || keys.is_empty() {
        return vec![SqlValue::Numeric(0.0); total];
    }

    peer_group_starts(partition, keys)
        .into_iter()
        .map(|start| SqlValue::Numeric(start as f64 / (total - 1) as f64))
        .collect()
}

/// Evaluate CUME_DIST() window function
///
/// Fraction of partition rows ordered at or before the current row,
/// counting all of its peers.
pub fn evaluate_cume_dist(partition: &Partition, keys: &[SortKey]) -> Vec<SqlValue> {
    let total = partition.len();
    if keys.is_empty() {
        return vec![SqlValue::Numeric(1.0); total];
    }

    let mut result = vec![SqlValue::Null; total];
    let mut group_start = 0;
    for idx in 0..total {
        let group_ends_here =
            idx + 1 == total || !is_peer(partition.rows[idx], partition.rows[idx + 1], keys);
        if group_ends_here {
            let dist = SqlValue::Numeric((idx + 1) as f64 / total as f64);
            for slot in &mut result[group_start..=idx] {
                *slot = dist.clone();
            }
            group_start = idx + 1;
        }
    }
    result
}

/// Evaluate NTILE(n) window function
///
/// Divides partition into n approximately equal groups (buckets/tiles).
/// Returns the group number (1 to n) for each row.
///
/// If rows don't divide evenly, earlier groups get one extra row.
/// Example: NTILE(4) on 10 rows → [1, 1, 1, 2, 2, 2, 3, 3, 4, 4]
pub fn evaluate_ntile(partition: &Partition, n_buckets: usize) -> Vec<SqlValue> {
    let total_rows = partition.len();

    // If n >= total_rows, each row gets its own bucket
    if n_buckets >= total_rows {
        return (1..=total_rows).map(|i| SqlValue::Integer(i as i64)).collect();
    }

    // First `remainder` buckets get (base_size + 1) rows
    let base_size = total_rows / n_buckets;
    let remainder = total_rows % n_buckets;

    let mut bucket_numbers = Vec::with_capacity(total_rows);
    let mut current_bucket = 1usize;
    let mut rows_in_current_bucket = 0;

    for _ in 0..total_rows {
        bucket_numbers.push(SqlValue::Integer(current_bucket as i64));
        rows_in_current_bucket += 1;

        let bucket_size = if current_bucket <= remainder { base_size + 1 } else { base_size };
        if rows_in_current_bucket >= bucket_size {
            current_bucket += 1;
            rows_in_current_bucket = 0;
        }
    }

    bucket_numbers
}
