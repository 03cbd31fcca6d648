//! Unpivot: turn value columns back into (category, value) rows

use winsql_ast::UnpivotSpec;
use winsql_storage::{ColumnSchema, Relation, RelationSchema, Row};
use winsql_types::{DataType, SqlValue};

use crate::errors::{column_not_found, CoreError, SchemaError, SpecError};

/// Unpivot `relation` according to `spec`
///
/// Each input row yields one output row per value column, carrying the key
/// columns, the column's category value and the cell. NULL cells are skipped
/// unless `include_nulls` is set.
pub fn unpivot(relation: &Relation, spec: &UnpivotSpec) -> Result<Relation, CoreError> {
    let (bound, schema) = BoundUnpivot::bind(spec, relation.schema())?;
    let rows = bound.apply(relation.rows());
    Ok(Relation::try_new(schema, rows)?)
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BoundUnpivot {
    key_columns: Vec<usize>,
    /// (input column, category value) pairs in output order
    value_columns: Vec<(usize, SqlValue)>,
    include_nulls: bool,
}

impl BoundUnpivot {
    pub(crate) fn bind(
        spec: &UnpivotSpec,
        schema: &RelationSchema,
    ) -> Result<(BoundUnpivot, RelationSchema), CoreError> {
        if spec.value_columns.is_empty() {
            return Err(SpecError::EmptyUnpivotColumns.into());
        }

        let resolve = |name: &str| -> Result<usize, SchemaError> {
            schema.index_of(name).ok_or_else(|| column_not_found(name, &schema.column_names()))
        };

        let key_columns =
            spec.key_columns.iter().map(|name| resolve(name)).collect::<Result<Vec<_>, _>>()?;

        let mut category_type = DataType::Null;
        let mut value_type = DataType::Null;
        let mut value_columns = Vec::with_capacity(spec.value_columns.len());

        for entry in &spec.value_columns {
            if entry.value.is_null() {
                return Err(SpecError::NullPivotCategory(entry.column.clone()).into());
            }
            if value_columns.iter().any(|(_, existing)| existing == &entry.value) {
                return Err(SpecError::DuplicatePivotCategory(entry.value.to_string()).into());
            }

            let idx = resolve(&entry.column)?;
            let column_type = schema.columns()[idx].data_type;

            category_type = unify(category_type, entry.value.get_type())?;
            value_type = unify(value_type, column_type)?;
            value_columns.push((idx, entry.value.clone()));
        }

        let mut output = RelationSchema::default();
        for &idx in &key_columns {
            output.push(schema.columns()[idx].clone())?;
        }
        output.push(ColumnSchema::new(spec.category_column.clone(), category_type, false))?;
        output.push(ColumnSchema::nullable(spec.value_column.clone(), value_type))?;

        let bound = BoundUnpivot { key_columns, value_columns, include_nulls: spec.include_nulls };
        Ok((bound, output))
    }

    pub(crate) fn apply(&self, rows: &[Row]) -> Vec<Row> {
        let mut output = Vec::with_capacity(rows.len() * self.value_columns.len());

        for row in rows {
            let key = row.project(&self.key_columns);
            for (idx, category) in &self.value_columns {
                let value = row.get(*idx).cloned().unwrap_or(SqlValue::Null);
                if value.is_null() && !self.include_nulls {
                    continue;
                }
                let mut values = key.values.clone();
                values.push(category.clone());
                values.push(value);
                output.push(Row::new(values));
            }
        }

        output
    }
}

fn unify(left: DataType, right: DataType) -> Result<DataType, SchemaError> {
    left.unify(right).ok_or_else(|| SchemaError::OperandTypeMismatch {
        left,
        op: "UNPIVOT".to_string(),
        right,
    })
}
