//! Pivot: turn category values into columns
//!
//! Rows are grouped on the group-by columns (NULL equal to NULL, groups in
//! order of first appearance). Each listed category becomes one output
//! column whose cell holds the value of the group's row in that category,
//! or an aggregate of those values when the request names one. Rows whose
//! category is NULL or unlisted still create their group but fill no cell.

mod unpivot;

use std::collections::HashMap;

use indexmap::IndexMap;
use itertools::Itertools;
use winsql_ast::{AggregateFunction, PivotSpec};
use winsql_storage::{ColumnSchema, Relation, RelationSchema, Row};
use winsql_types::{DataType, SqlValue};

pub use unpivot::unpivot;

use crate::{
    errors::{column_not_found, CoreError, SchemaError, SpecError},
    evaluator::window::Accumulator,
};

/// Pivot `relation` according to `spec`
pub fn pivot(relation: &Relation, spec: &PivotSpec) -> Result<Relation, CoreError> {
    let (bound, mut schema) = BoundPivot::bind(spec, relation.schema())?;
    let rows = bound.apply(relation.rows())?;
    schema.widen_to_fit(&rows);
    Ok(Relation::try_new(schema, rows)?)
}

/// A pivot request checked against its input schema
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BoundPivot {
    group_columns: Vec<usize>,
    category_column: usize,
    value_column: usize,
    /// Category values (normalized to the category column's type) and their output names
    categories: Vec<(SqlValue, String)>,
    aggregate: Option<AggregateFunction>,
}

enum Cells {
    Single(Vec<Option<SqlValue>>),
    Aggregated(Vec<Accumulator>),
}

impl BoundPivot {
    pub(crate) fn bind(
        spec: &PivotSpec,
        schema: &RelationSchema,
    ) -> Result<(BoundPivot, RelationSchema), CoreError> {
        if spec.categories.is_empty() {
            return Err(SpecError::EmptyPivotCategories.into());
        }

        let resolve = |name: &str| -> Result<usize, SchemaError> {
            schema.index_of(name).ok_or_else(|| column_not_found(name, &schema.column_names()))
        };

        let group_columns =
            spec.group_by.iter().map(|name| resolve(name)).collect::<Result<Vec<_>, _>>()?;
        let category_column = resolve(&spec.category_column)?;
        let value_column = resolve(&spec.value_column)?;

        let category_type = schema.columns()[category_column].data_type;
        let value_type = schema.columns()[value_column].data_type;

        let mut categories: Vec<(SqlValue, String)> = Vec::with_capacity(spec.categories.len());
        for category in &spec.categories {
            if category.value.is_null() {
                return Err(SpecError::NullPivotCategory(category.column.clone()).into());
            }
            if !category_type.is_compatible_with(&category.value) {
                return Err(SchemaError::TypeMismatch {
                    column: spec.category_column.clone(),
                    expected: category.value.get_type().to_string(),
                    found: category_type,
                }
                .into());
            }
            let value = match (category_type, &category.value) {
                (DataType::Numeric, SqlValue::Integer(i)) => SqlValue::Numeric(*i as f64),
                (_, value) => value.clone(),
            };
            if categories.iter().any(|(existing, _)| existing == &value) {
                return Err(SpecError::DuplicatePivotCategory(value.to_string()).into());
            }
            categories.push((value, category.column.clone()));
        }

        let (cell_type, nullable) = match spec.aggregate {
            None => (value_type, true),
            Some(function) => {
                if !function.accepts(value_type) {
                    return Err(SchemaError::TypeMismatch {
                        column: spec.value_column.clone(),
                        expected: "INTEGER or NUMERIC".to_string(),
                        found: value_type,
                    }
                    .into());
                }
                let counts =
                    matches!(function, AggregateFunction::Count | AggregateFunction::CountStar);
                (function.result_type(value_type), !counts)
            }
        };

        let mut output = RelationSchema::default();
        for &idx in &group_columns {
            output.push(schema.columns()[idx].clone())?;
        }
        for (_, name) in &categories {
            output.push(ColumnSchema::new(name.clone(), cell_type, nullable))?;
        }

        let bound = BoundPivot {
            group_columns,
            category_column,
            value_column,
            categories,
            aggregate: spec.aggregate,
        };
        Ok((bound, output))
    }

    fn empty_cells(&self) -> Cells {
        match self.aggregate {
            None => Cells::Single(vec![None; self.categories.len()]),
            Some(function) => {
                Cells::Aggregated(vec![Accumulator::new(function); self.categories.len()])
            }
        }
    }

    pub(crate) fn apply(&self, rows: &[Row]) -> Result<Vec<Row>, CoreError> {
        let category_index: HashMap<&SqlValue, usize> =
            self.categories.iter().enumerate().map(|(idx, (value, _))| (value, idx)).collect();

        let mut groups: IndexMap<Vec<SqlValue>, Cells> = IndexMap::new();

        for row in rows {
            let key = row.project(&self.group_columns).values;
            let group = match groups.get_index_of(&key) {
                Some(group) => group,
                None => groups.insert_full(key, self.empty_cells()).0,
            };

            let category = row.get(self.category_column).unwrap_or(&SqlValue::Null);
            let Some(&cell) = category_index.get(category) else {
                continue;
            };
            let Some((key, cells)) = groups.get_index_mut(group) else {
                continue;
            };
            let value = row.get(self.value_column).cloned().unwrap_or(SqlValue::Null);

            match cells {
                Cells::Single(slots) => {
                    if slots[cell].is_some() {
                        return Err(SpecError::AmbiguousPivotCell {
                            group: key.iter().join(", "),
                            category: self.categories[cell].1.clone(),
                        }
                        .into());
                    }
                    slots[cell] = Some(value);
                }
                Cells::Aggregated(accumulators) => accumulators[cell].accumulate(&value),
            }
        }

        log::trace!("pivot produced {} groups from {} rows", groups.len(), rows.len());

        Ok(groups
            .into_iter()
            .map(|(key, cells)| {
                let mut values = key;
                match cells {
                    Cells::Single(slots) => {
                        values.extend(slots.into_iter().map(|v| v.unwrap_or(SqlValue::Null)))
                    }
                    Cells::Aggregated(accumulators) => {
                        values.extend(accumulators.iter().map(Accumulator::finish))
                    }
                }
                Row::new(values)
            })
            .collect())
    }
}
