//! Island (consecutive run) detection
//!
//! Rows of a sorted partition are grouped into islands by subtracting a
//! per-row sequence number from a per-row "position" and grouping on the
//! difference, which stays constant along a run:
//!
//! - `EqualValue`: position in the partition minus the number of earlier
//!   rows with the same value. Runs of equal values in window order share
//!   the difference.
//! - `IntegerSuccessor` / `DaySuccessor`: the value itself (days since the
//!   epoch for dates) minus its DENSE_RANK in ascending value order.
//!   Duplicates share a rank, so they join the same run. NULLs belong to no
//!   island.

use std::collections::HashMap;

use winsql_ast::{Contiguity, IslandOutput, IslandSpec, WindowSpec};
use winsql_storage::{ColumnSchema, RelationSchema, Row};
use winsql_types::{DataType, SqlValue};

use crate::{
    errors::{column_not_found, CoreError, SchemaError},
    evaluator::window::{compare_values, Partition},
};

/// One detected island within a partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Island {
    /// 1-based, in order of first appearance
    pub group_id: i64,
    /// Partition position of the island's first member (in detection order)
    pub first: usize,
    /// Partition position of the island's last member (in detection order)
    pub last: usize,
    /// Length of the run: rows for `EqualValue`, distinct values otherwise
    pub run_length: usize,
    /// Number of rows in the island
    pub members: usize,
}

/// Islands of one partition and the island each row belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IslandDetection {
    pub islands: Vec<Island>,
    /// Index into `islands` per partition position; `None` for NULL values
    /// under the successor contiguities
    pub assignments: Vec<Option<usize>>,
}

impl IslandDetection {
    pub fn island_of(&self, position: usize) -> Option<&Island> {
        self.assignments.get(position).copied().flatten().map(|idx| &self.islands[idx])
    }
}

/// Detect islands over `column` in a partition already sorted in window order
pub fn detect_islands(
    partition: &Partition,
    column: usize,
    contiguity: Contiguity,
) -> IslandDetection {
    match contiguity {
        Contiguity::EqualValue => detect_equal_runs(partition, column),
        Contiguity::IntegerSuccessor | Contiguity::DaySuccessor => {
            detect_successor_runs(partition, column, contiguity)
        }
    }
}

fn detect_equal_runs(partition: &Partition, column: usize) -> IslandDetection {
    let mut seen: HashMap<&SqlValue, i64> = HashMap::new();
    let mut island_index: HashMap<(&SqlValue, i64), usize> = HashMap::new();
    let mut islands: Vec<Island> = Vec::new();
    let mut assignments = Vec::with_capacity(partition.len());

    for position in 0..partition.len() {
        let value = partition.value(position, column);
        let count = seen.entry(value).or_insert(0);
        let key = position as i64 - *count;
        *count += 1;

        let idx = *island_index.entry((value, key)).or_insert_with(|| {
            islands.push(Island {
                group_id: islands.len() as i64 + 1,
                first: position,
                last: position,
                run_length: 0,
                members: 0,
            });
            islands.len() - 1
        });

        let island = &mut islands[idx];
        island.last = position;
        island.run_length += 1;
        island.members += 1;
        assignments.push(Some(idx));
    }

    IslandDetection { islands, assignments }
}

/// Integer coordinate of a value along the successor axis
fn successor_coordinate(value: &SqlValue, contiguity: Contiguity) -> Option<i64> {
    match contiguity {
        Contiguity::IntegerSuccessor => value.as_i64(),
        Contiguity::DaySuccessor => value.as_date().map(|d| d.to_day_number()),
        Contiguity::EqualValue => None,
    }
}

fn detect_successor_runs(
    partition: &Partition,
    column: usize,
    contiguity: Contiguity,
) -> IslandDetection {
    // Ascending value order, so an island's first and last members hold its
    // smallest and largest values (timestamps sharing a day included). The
    // stable sort keeps window order among duplicates.
    let mut order: Vec<(usize, i64)> = (0..partition.len())
        .filter_map(|position| {
            successor_coordinate(partition.value(position, column), contiguity)
                .map(|coordinate| (position, coordinate))
        })
        .collect();
    order.sort_by(|&(a, coordinate_a), &(b, coordinate_b)| {
        coordinate_a.cmp(&coordinate_b).then_with(|| {
            compare_values(partition.value(a, column), partition.value(b, column))
        })
    });

    let mut islands: Vec<Island> = Vec::new();
    let mut assignments = vec![None; partition.len()];
    let mut dense_rank = 0i64;
    let mut previous: Option<i64> = None;
    let mut current_key: Option<i64> = None;

    for (position, coordinate) in order {
        let is_new_value = previous != Some(coordinate);
        if is_new_value {
            dense_rank += 1;
        }
        previous = Some(coordinate);

        let key = coordinate.wrapping_sub(dense_rank);
        if current_key != Some(key) {
            current_key = Some(key);
            islands.push(Island {
                group_id: islands.len() as i64 + 1,
                first: position,
                last: position,
                run_length: 0,
                members: 0,
            });
        }

        let idx = islands.len() - 1;
        let island = &mut islands[idx];
        island.last = position;
        island.members += 1;
        if is_new_value {
            island.run_length += 1;
        }
        assignments[position] = Some(idx);
    }

    IslandDetection { islands, assignments }
}

/// Where the `run_start` / `run_end` bounds of an island come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunAnchor {
    Column(usize),
    /// 1-based partition positions, for unordered equal-value runs
    Position,
}

/// An island request checked against the schema it runs on
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BoundIslands {
    column: usize,
    contiguity: Contiguity,
    output: IslandOutput,
    min_length: usize,
    partition_columns: Vec<usize>,
    anchor: RunAnchor,
}

impl BoundIslands {
    /// Validate `spec` against `schema` and return the schema the stage produces
    pub(crate) fn bind(
        spec: &IslandSpec,
        window: &WindowSpec,
        schema: &RelationSchema,
    ) -> Result<(BoundIslands, RelationSchema), CoreError> {
        let resolve = |name: &str| -> Result<usize, SchemaError> {
            schema.index_of(name).ok_or_else(|| column_not_found(name, &schema.column_names()))
        };

        let column = resolve(&spec.column)?;
        let column_schema = &schema.columns()[column];
        let expected = match spec.contiguity {
            Contiguity::EqualValue => None,
            Contiguity::IntegerSuccessor => {
                (column_schema.data_type != DataType::Integer).then_some("INTEGER")
            }
            Contiguity::DaySuccessor => {
                (!matches!(column_schema.data_type, DataType::Date | DataType::Timestamp))
                    .then_some("DATE or TIMESTAMP")
            }
        };
        if let Some(expected) = expected {
            return Err(SchemaError::TypeMismatch {
                column: spec.column.clone(),
                expected: expected.to_string(),
                found: column_schema.data_type,
            }
            .into());
        }

        let partition_columns =
            window.partition_by.iter().map(|name| resolve(name)).collect::<Result<Vec<_>, _>>()?;

        let anchor = match (spec.contiguity, window.order_by.first()) {
            (Contiguity::EqualValue, Some(first)) => RunAnchor::Column(resolve(&first.column)?),
            (Contiguity::EqualValue, None) => RunAnchor::Position,
            _ => RunAnchor::Column(column),
        };

        // NULLs have no island under the successor contiguities
        let nullable_ids = spec.contiguity != Contiguity::EqualValue;
        let output_schema = match spec.output {
            IslandOutput::PerRow => {
                let mut output = schema.clone();
                output.push(ColumnSchema::new(
                    spec.group_id_column.clone(),
                    DataType::Integer,
                    nullable_ids,
                ))?;
                output.push(ColumnSchema::new(
                    spec.run_length_column.clone(),
                    DataType::Integer,
                    nullable_ids,
                ))?;
                output
            }
            IslandOutput::Groups => {
                let mut output = RelationSchema::default();
                for &idx in &partition_columns {
                    output.push(schema.columns()[idx].clone())?;
                }
                output.push(ColumnSchema::new(
                    spec.group_id_column.clone(),
                    DataType::Integer,
                    false,
                ))?;
                if spec.contiguity == Contiguity::EqualValue {
                    output.push(column_schema.clone())?;
                }
                let anchor_type = match anchor {
                    RunAnchor::Column(idx) => schema.columns()[idx].data_type,
                    RunAnchor::Position => DataType::Integer,
                };
                output.push(ColumnSchema::nullable("run_start", anchor_type))?;
                output.push(ColumnSchema::nullable("run_end", anchor_type))?;
                output.push(ColumnSchema::new(
                    spec.run_length_column.clone(),
                    DataType::Integer,
                    false,
                ))?;
                output.push(ColumnSchema::new("member_count", DataType::Integer, false))?;
                output
            }
        };

        let bound = BoundIslands {
            column,
            contiguity: spec.contiguity,
            output: spec.output,
            min_length: spec.min_length.unwrap_or(0),
            partition_columns,
            anchor,
        };
        Ok((bound, output_schema))
    }

    pub(crate) fn detect(&self, partition: &Partition) -> IslandDetection {
        detect_islands(partition, self.column, self.contiguity)
    }

    pub(crate) fn output(&self) -> IslandOutput {
        self.output
    }

    fn keeps(&self, island: &Island) -> bool {
        island.run_length >= self.min_length
    }

    /// Annotate rows (in partition order) with group id and run length.
    ///
    /// Rows in islands shorter than the minimum length are dropped, and so
    /// are rows without an island when a minimum is set.
    pub(crate) fn annotate(
        &self,
        rows: Vec<Row>,
        detection: &IslandDetection,
    ) -> Vec<(usize, Row)> {
        rows.into_iter()
            .enumerate()
            .filter_map(|(position, mut row)| {
                match detection.island_of(position) {
                    Some(island) if self.keeps(island) => {
                        row.add_value(SqlValue::Integer(island.group_id));
                        row.add_value(SqlValue::Integer(island.run_length as i64));
                    }
                    Some(_) => return None,
                    None if self.min_length > 0 => return None,
                    None => {
                        row.add_value(SqlValue::Null);
                        row.add_value(SqlValue::Null);
                    }
                }
                Some((position, row))
            })
            .collect()
    }

    /// One row per island, in group id order
    pub(crate) fn group_rows(
        &self,
        partition: &Partition,
        detection: &IslandDetection,
    ) -> Vec<Row> {
        detection
            .islands
            .iter()
            .filter(|island| self.keeps(island))
            .map(|island| {
                let mut values: Vec<SqlValue> = self
                    .partition_columns
                    .iter()
                    .map(|&idx| partition.value(island.first, idx).clone())
                    .collect();
                values.push(SqlValue::Integer(island.group_id));
                if self.contiguity == Contiguity::EqualValue {
                    values.push(partition.value(island.first, self.column).clone());
                }
                let (start, end) = match self.anchor {
                    RunAnchor::Column(idx) => (
                        partition.value(island.first, idx).clone(),
                        partition.value(island.last, idx).clone(),
                    ),
                    RunAnchor::Position => (
                        SqlValue::Integer(island.first as i64 + 1),
                        SqlValue::Integer(island.last as i64 + 1),
                    ),
                };
                values.push(start);
                values.push(end);
                values.push(SqlValue::Integer(island.run_length as i64));
                values.push(SqlValue::Integer(island.members as i64));
                Row::new(values)
            })
            .collect()
    }
}
