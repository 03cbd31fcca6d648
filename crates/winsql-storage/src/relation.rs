use serde::Serialize;
use winsql_types::{DataType, SqlValue};

use crate::{RelationSchema, Row, RowValidationError};

/// An unordered multiset of rows sharing one schema.
///
/// Every row is checked against the schema when the relation is built: the
/// value count must match, each non-NULL value must fit its column type, and
/// NULLs only appear in nullable columns. INTEGER values stored in NUMERIC
/// columns are widened so that equal column values are always the same variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relation {
    schema: RelationSchema,
    rows: Vec<Row>,
}

impl Relation {
    /// Build a relation, validating every row against `schema`
    pub fn try_new(schema: RelationSchema, rows: Vec<Row>) -> Result<Self, RowValidationError> {
        Self::from_row_iter(schema, rows)
    }

    /// Build a relation from any row source
    pub fn from_row_iter<I>(schema: RelationSchema, rows: I) -> Result<Self, RowValidationError>
    where
        I: IntoIterator<Item = Row>,
    {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(idx, row)| conform_row(&schema, idx, row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Relation { schema, rows })
    }

    /// A relation with no rows
    pub fn empty(schema: RelationSchema) -> Self {
        Relation { schema, rows: Vec::new() }
    }

    pub fn schema(&self) -> &RelationSchema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Value at (`row`, `column`)
    pub fn get(&self, row: usize, column: &str) -> Option<&SqlValue> {
        let index = self.schema.index_of(column)?;
        self.rows.get(row)?.get(index)
    }

    /// All values of one column, in row order
    pub fn column_values(&self, column: &str) -> Option<Vec<&SqlValue>> {
        let index = self.schema.index_of(column)?;
        Some(self.rows.iter().filter_map(|row| row.get(index)).collect())
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn into_parts(self) -> (RelationSchema, Vec<Row>) {
        (self.schema, self.rows)
    }
}

impl<'a> IntoIterator for &'a Relation {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

fn conform_row(schema: &RelationSchema, idx: usize, mut row: Row) -> Result<Row, RowValidationError> {
    if row.len() != schema.len() {
        return Err(RowValidationError::ArityMismatch {
            row: idx,
            expected: schema.len(),
            provided: row.len(),
        });
    }

    for (value, column) in row.values.iter_mut().zip(schema.columns()) {
        if value.is_null() {
            if !column.nullable {
                return Err(RowValidationError::NullViolation {
                    row: idx,
                    column: column.name.clone(),
                });
            }
            continue;
        }

        if !column.data_type.is_compatible_with(value) {
            return Err(RowValidationError::TypeMismatch {
                row: idx,
                column: column.name.clone(),
                expected: column.data_type,
                found: value.get_type(),
            });
        }

        if column.data_type == DataType::Numeric {
            if let Some(i) = value.as_i64() {
                *value = SqlValue::Numeric(i as f64);
            }
        }
    }

    Ok(row)
}
