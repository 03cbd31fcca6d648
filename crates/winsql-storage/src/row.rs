use serde::{Deserialize, Serialize};
use winsql_types::SqlValue;

/// A single row of data - vector of SqlValues, positional against its schema
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Row {
    pub values: Vec<SqlValue>,
}

impl Row {
    /// Create a new row from values
    pub fn new(values: Vec<SqlValue>) -> Self {
        Row { values }
    }

    /// Get value at column index
    pub fn get(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    /// Get number of columns in this row
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if row is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Add a value to the end of the row
    pub fn add_value(&mut self, value: SqlValue) {
        self.values.push(value);
    }

    /// New row holding the values at `indices`, in that order
    pub fn project(&self, indices: &[usize]) -> Row {
        Row::new(indices.iter().filter_map(|&i| self.values.get(i).cloned()).collect())
    }
}

impl From<Vec<SqlValue>> for Row {
    fn from(values: Vec<SqlValue>) -> Self {
        Row::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_reorders() {
        let row = Row::new(vec![SqlValue::Integer(1), SqlValue::from("a"), SqlValue::Null]);
        let projected = row.project(&[2, 0]);
        assert_eq!(projected.values, vec![SqlValue::Null, SqlValue::Integer(1)]);
    }
}
