use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use winsql_types::{DataType, SqlValue};

use crate::{Row, SchemaDefinitionError};

/// Column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: DataType,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        ColumnSchema { name: name.into(), data_type, nullable }
    }

    /// A nullable column
    pub fn nullable(name: impl Into<String>, data_type: DataType) -> Self {
        Self::new(name, data_type, true)
    }
}

/// Ordered list of columns shared by every row of a relation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<ColumnSchema>", into = "Vec<ColumnSchema>")]
pub struct RelationSchema {
    columns: Vec<ColumnSchema>,
}

impl RelationSchema {
    /// Build a schema, rejecting duplicate column names
    pub fn new(columns: Vec<ColumnSchema>) -> Result<Self, SchemaDefinitionError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(SchemaDefinitionError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(RelationSchema { columns })
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of the column called `name`
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Append a column, rejecting a duplicate name
    pub fn push(&mut self, column: ColumnSchema) -> Result<(), SchemaDefinitionError> {
        if self.index_of(&column.name).is_some() {
            return Err(SchemaDefinitionError::DuplicateColumn(column.name));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Widen INTEGER columns to NUMERIC where `rows` hold NUMERIC values.
    ///
    /// Integer sums and products fall back to NUMERIC when they overflow, so a
    /// column typed INTEGER at bind time may carry a NUMERIC at run time.
    pub fn widen_to_fit(&mut self, rows: &[Row]) {
        for (idx, column) in self.columns.iter_mut().enumerate() {
            if column.data_type == DataType::Integer
                && rows.iter().any(|row| matches!(row.get(idx), Some(SqlValue::Numeric(_))))
            {
                column.data_type = DataType::Numeric;
            }
        }
    }
}

impl TryFrom<Vec<ColumnSchema>> for RelationSchema {
    type Error = SchemaDefinitionError;

    fn try_from(columns: Vec<ColumnSchema>) -> Result<Self, Self::Error> {
        RelationSchema::new(columns)
    }
}

impl From<RelationSchema> for Vec<ColumnSchema> {
    fn from(schema: RelationSchema) -> Self {
        schema.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_column_rejected() {
        let result = RelationSchema::new(vec![
            ColumnSchema::nullable("id", DataType::Integer),
            ColumnSchema::nullable("id", DataType::Varchar),
        ]);
        assert_eq!(result, Err(SchemaDefinitionError::DuplicateColumn("id".to_string())));
    }

    #[test]
    fn test_lookup() {
        let schema = RelationSchema::new(vec![
            ColumnSchema::nullable("id", DataType::Integer),
            ColumnSchema::new("name", DataType::Varchar, false),
        ])
        .unwrap();
        assert_eq!(schema.index_of("name"), Some(1));
        assert_eq!(schema.index_of("missing"), None);
        assert!(!schema.column("name").unwrap().nullable);
    }

    #[test]
    fn test_widen_to_fit() {
        let mut schema = RelationSchema::new(vec![
            ColumnSchema::nullable("a", DataType::Integer),
            ColumnSchema::nullable("b", DataType::Integer),
        ])
        .unwrap();
        let rows = vec![
            Row::new(vec![SqlValue::Integer(1), SqlValue::Integer(2)]),
            Row::new(vec![SqlValue::Integer(3), SqlValue::Numeric(1.8e19)]),
        ];
        schema.widen_to_fit(&rows);
        assert_eq!(schema.columns()[0].data_type, DataType::Integer);
        assert_eq!(schema.columns()[1].data_type, DataType::Numeric);
    }
}
