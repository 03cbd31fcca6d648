//! Partition sorting for window functions
//!
//! Sorts rows within partitions according to ORDER BY specifications.

use std::cmp::Ordering;

use winsql_ast::{NullsOrder, OrderByItem, OrderDirection};
use winsql_storage::{RelationSchema, Row};
use winsql_types::SqlValue;

use super::partitioning::Partition;
use crate::errors::{column_not_found, SchemaError};

/// An ORDER BY item resolved to a column position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: usize,
    pub direction: OrderDirection,
    pub nulls: NullsOrder,
}

impl SortKey {
    pub fn resolve(item: &OrderByItem, schema: &RelationSchema) -> Result<SortKey, SchemaError> {
        let column = schema
            .index_of(&item.column)
            .ok_or_else(|| column_not_found(&item.column, &schema.column_names()))?;
        Ok(SortKey { column, direction: item.direction, nulls: item.effective_nulls() })
    }
}

pub fn resolve_sort_keys(
    items: &[OrderByItem],
    schema: &RelationSchema,
) -> Result<Vec<SortKey>, SchemaError> {
    items.iter().map(|item| SortKey::resolve(item, schema)).collect()
}

/// Sort a partition by its sort keys
///
/// The sort is stable: rows with equal keys keep their input order.
/// Also keeps original_indices in sync with the sorted rows.
pub fn sort_partition(partition: &mut Partition, keys: &[SortKey]) {
    if keys.is_empty() {
        return;
    }

    let mut order: Vec<usize> = (0..partition.len()).collect();
    let rows = &partition.rows;
    order.sort_by(|&a, &b| compare_rows(rows[a], rows[b], keys));

    let old_rows = std::mem::take(&mut partition.rows);
    let old_indices = std::mem::take(&mut partition.original_indices);

    partition.rows = order.iter().map(|&i| old_rows[i]).collect();
    partition.original_indices = order.iter().map(|&i| old_indices[i]).collect();
}

/// Compare two rows key by key, honouring direction and NULL placement
pub fn compare_rows(a: &Row, b: &Row, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let val_a = a.get(key.column).unwrap_or(&SqlValue::Null);
        let val_b = b.get(key.column).unwrap_or(&SqlValue::Null);

        let cmp = match (val_a.is_null(), val_b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => match key.nulls {
                NullsOrder::First => Ordering::Less,
                NullsOrder::Last => Ordering::Greater,
            },
            (false, true) => match key.nulls {
                NullsOrder::First => Ordering::Greater,
                NullsOrder::Last => Ordering::Less,
            },
            (false, false) => {
                let cmp = compare_values(val_a, val_b);
                match key.direction {
                    OrderDirection::Asc => cmp,
                    OrderDirection::Desc => cmp.reverse(),
                }
            }
        };

        if cmp != Ordering::Equal {
            return cmp;
        }
    }
    Ordering::Equal
}

/// Whether two rows tie on every sort key (peers for RANK and friends)
pub fn is_peer(a: &Row, b: &Row, keys: &[SortKey]) -> bool {
    compare_rows(a, b, keys) == Ordering::Equal
}

/// Compare two SQL values for ordering
///
/// NULL sorts below everything here; callers that care about NULL
/// placement handle it before calling. INTEGER and NUMERIC compare
/// numerically, NaN sorts above every number.
pub fn compare_values(a: &SqlValue, b: &SqlValue) -> Ordering {
    a.sql_cmp(b).unwrap_or_else(|| a.cmp(b))
}
