//! Shared fixtures for end-to-end tests

#![allow(dead_code)]

use winsql::{
    storage::{ColumnSchema, Relation, RelationSchema, Row},
    types::{DataType, Date, SqlValue},
};

/// Build a relation of nullable columns from literal rows
pub fn relation(columns: &[(&str, DataType)], rows: Vec<Vec<SqlValue>>) -> Relation {
    let schema = RelationSchema::new(
        columns.iter().map(|(name, data_type)| ColumnSchema::nullable(*name, *data_type)).collect(),
    )
    .expect("valid schema");
    Relation::try_new(schema, rows.into_iter().map(Row::new).collect()).expect("valid rows")
}

/// All values of `name`, in row order
pub fn column(relation: &Relation, name: &str) -> Vec<SqlValue> {
    relation
        .column_values(name)
        .unwrap_or_else(|| panic!("no column {name}"))
        .into_iter()
        .cloned()
        .collect()
}

pub fn ints(values: &[i64]) -> Vec<SqlValue> {
    values.iter().map(|v| SqlValue::Integer(*v)).collect()
}

pub fn date(text: &str) -> SqlValue {
    SqlValue::Date(text.parse::<Date>().expect("valid date"))
}
