//! Row partitioning for window functions
//!
//! Groups rows into partitions based on PARTITION BY columns.

use std::collections::BTreeMap;

use winsql_storage::{Relation, Row};
use winsql_types::SqlValue;

use crate::errors::{column_not_found, SchemaError};

/// A partition of rows for window function evaluation
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    /// Partition key values, one per PARTITION BY column
    pub key: Vec<SqlValue>,
    pub rows: Vec<&'a Row>,
    /// Original indices of rows before partitioning/sorting
    pub original_indices: Vec<usize>,
}

impl<'a> Partition<'a> {
    /// A single keyless partition over `rows` in input order
    pub fn new(rows: &'a [Row]) -> Self {
        Self {
            key: Vec::new(),
            rows: rows.iter().collect(),
            original_indices: (0..rows.len()).collect(),
        }
    }

    pub fn with_indices(
        key: Vec<SqlValue>,
        rows: Vec<&'a Row>,
        original_indices: Vec<usize>,
    ) -> Self {
        Self { key, rows, original_indices }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of column `column` in the row at partition position `idx`
    pub fn value(&self, idx: usize, column: usize) -> &SqlValue {
        self.rows.get(idx).and_then(|row| row.get(column)).unwrap_or(&SqlValue::Null)
    }
}

/// Partition rows by the columns at `key_indices`
///
/// Rows with equal keys (NULL equal to NULL) share a partition. Partitions
/// come back in ascending key order; rows inside keep their input order.
/// Without key columns, all rows go into a single partition.
pub fn partition_rows<'a>(rows: &'a [Row], key_indices: &[usize]) -> Vec<Partition<'a>> {
    if key_indices.is_empty() {
        return vec![Partition::new(rows)];
    }

    let mut partitions_map: BTreeMap<Vec<SqlValue>, (Vec<&'a Row>, Vec<usize>)> = BTreeMap::new();

    for (original_idx, row) in rows.iter().enumerate() {
        let key: Vec<SqlValue> =
            key_indices.iter().map(|&i| row.get(i).cloned().unwrap_or(SqlValue::Null)).collect();
        let entry = partitions_map.entry(key).or_default();
        entry.0.push(row);
        entry.1.push(original_idx);
    }

    partitions_map
        .into_iter()
        .map(|(key, (rows, indices))| Partition::with_indices(key, rows, indices))
        .collect()
}

/// Partition a relation by column names
pub fn partition_relation<'a>(
    relation: &'a Relation,
    partition_by: &[String],
) -> Result<Vec<Partition<'a>>, SchemaError> {
    let schema = relation.schema();
    let key_indices = partition_by
        .iter()
        .map(|name| {
            schema.index_of(name).ok_or_else(|| column_not_found(name, &schema.column_names()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(partition_rows(relation.rows(), &key_indices))
}
