use winsql_storage::Row;
use winsql_types::SqlValue;

use super::{asc, desc, ints, make_nullable_rows, make_test_rows};
use crate::evaluator::window::*;

// ===== ROW_NUMBER Tests =====

#[test]
fn test_row_number_simple() {
    let rows = make_test_rows(vec![10, 20, 30, 40, 50]);
    let partition = Partition::new(&rows);

    assert_eq!(evaluate_row_number(&partition), ints(&[1, 2, 3, 4, 5]));
}

// ===== RANK Tests =====

#[test]
fn test_rank_with_ties() {
    // Scores: 95, 90, 90, 85
    let rows = make_test_rows(vec![95, 90, 90, 85]);
    let partition = Partition::new(&rows);

    assert_eq!(evaluate_rank(&partition, &[desc(0)]), ints(&[1, 2, 2, 4]));
}

#[test]
fn test_rank_without_order_is_all_peers() {
    let rows = make_test_rows(vec![3, 1, 2]);
    let partition = Partition::new(&rows);
    assert_eq!(evaluate_rank(&partition, &[]), ints(&[1, 1, 1]));
}

#[test]
fn test_rank_treats_nulls_as_peers() {
    let rows = make_nullable_rows(vec![Some(1), None, None]);
    let partition = Partition::new(&rows);
    assert_eq!(evaluate_rank(&partition, &[asc(0)]), ints(&[1, 2, 2]));
}

// ===== DENSE_RANK Tests =====

#[test]
fn test_dense_rank_with_ties() {
    let rows = make_test_rows(vec![95, 90, 90, 85]);
    let partition = Partition::new(&rows);

    assert_eq!(evaluate_dense_rank(&partition, &[desc(0)]), ints(&[1, 2, 2, 3]));
}

#[test]
fn test_dense_rank_multiple_keys() {
    let rows = vec![
        Row::new(vec![SqlValue::Integer(1), SqlValue::Integer(1)]),
        Row::new(vec![SqlValue::Integer(1), SqlValue::Integer(1)]),
        Row::new(vec![SqlValue::Integer(1), SqlValue::Integer(2)]),
        Row::new(vec![SqlValue::Integer(2), SqlValue::Integer(1)]),
    ];
    let partition = Partition::new(&rows);
    assert_eq!(evaluate_dense_rank(&partition, &[asc(0), asc(1)]), ints(&[1, 1, 2, 3]));
    assert_eq!(evaluate_dense_rank(&partition, &[asc(0)]), ints(&[1, 1, 1, 2]));
}

// ===== NTILE Tests =====

#[test]
fn test_ntile_even_distribution() {
    let rows = make_test_rows((1..=8).collect());
    let partition = Partition::new(&rows);
    assert_eq!(evaluate_ntile(&partition, 4), ints(&[1, 1, 2, 2, 3, 3, 4, 4]));
}

#[test]
fn test_ntile_uneven_distribution() {
    let rows = make_test_rows((1..=10).collect());
    let partition = Partition::new(&rows);
    assert_eq!(evaluate_ntile(&partition, 4), ints(&[1, 1, 1, 2, 2, 2, 3, 3, 4, 4]));
}

#[test]
fn test_ntile_more_buckets_than_rows() {
    let rows = make_test_rows(vec![1, 2, 3]);
    let partition = Partition::new(&rows);
    assert_eq!(evaluate_ntile(&partition, 5), ints(&[1, 2, 3]));
}

// ===== PERCENT_RANK / CUME_DIST Tests =====

#[test]
fn test_percent_rank() {
    let rows = make_test_rows(vec![10, 20, 20, 30]);
    let partition = Partition::new(&rows);
    let result = evaluate_percent_rank(&partition, &[asc(0)]);
    let expected = [0.0, 1.0 / 3.0, 1.0 / 3.0, 1.0];
    for (value, expected) in result.iter().zip(expected) {
        assert_eq!(value, &SqlValue::Numeric(expected));
    }
}

#[test]
fn test_percent_rank_single_row() {
    let rows = make_test_rows(vec![42]);
    let partition = Partition::new(&rows);
    assert_eq!(evaluate_percent_rank(&partition, &[asc(0)]), vec![SqlValue::Numeric(0.0)]);
}

#[test]
fn test_cume_dist_counts_peers() {
    let rows = make_test_rows(vec![10, 20, 20, 30]);
    let partition = Partition::new(&rows);
    assert_eq!(
        evaluate_cume_dist(&partition, &[asc(0)]),
        vec![
            SqlValue::Numeric(0.25),
            SqlValue::Numeric(0.75),
            SqlValue::Numeric(0.75),
            SqlValue::Numeric(1.0),
        ]
    );
}

// ===== Sorting Tests =====

#[test]
fn test_sort_partition_default_nulls_placement() {
    let rows = make_nullable_rows(vec![Some(2), None, Some(1)]);

    let mut ascending = Partition::new(&rows);
    sort_partition(&mut ascending, &[asc(0)]);
    assert_eq!(ascending.original_indices, vec![2, 0, 1]);

    let mut descending = Partition::new(&rows);
    sort_partition(&mut descending, &[desc(0)]);
    assert_eq!(descending.original_indices, vec![1, 0, 2]);
}

#[test]
fn test_sort_partition_is_stable() {
    let rows = vec![
        Row::new(vec![SqlValue::Integer(1), SqlValue::from("first")]),
        Row::new(vec![SqlValue::Integer(0), SqlValue::from("zero")]),
        Row::new(vec![SqlValue::Integer(1), SqlValue::from("second")]),
    ];
    let mut partition = Partition::new(&rows);
    sort_partition(&mut partition, &[asc(0)]);
    assert_eq!(partition.original_indices, vec![1, 0, 2]);
    assert_eq!(partition.value(2, 1), &SqlValue::from("second"));
}

#[test]
fn test_compare_values_mixed_numeric() {
    use std::cmp::Ordering;
    assert_eq!(compare_values(&SqlValue::Integer(2), &SqlValue::Numeric(1.5)), Ordering::Greater);
    assert_eq!(compare_values(&SqlValue::Numeric(2.0), &SqlValue::Integer(2)), Ordering::Equal);
    assert_eq!(
        compare_values(&SqlValue::Numeric(f64::NAN), &SqlValue::Numeric(1e300)),
        Ordering::Greater
    );
}
