use winsql_types::DataType;

/// A row that does not conform to its relation's schema
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowValidationError {
    #[error("row {row} has {provided} values but the schema declares {expected} columns")]
    ArityMismatch { row: usize, expected: usize, provided: usize },

    #[error("row {row}, column '{column}': expected {expected}, found {found}")]
    TypeMismatch { row: usize, column: String, expected: DataType, found: DataType },

    #[error("row {row}, column '{column}': NULL in a non-nullable column")]
    NullViolation { row: usize, column: String },
}

/// An invalid schema definition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaDefinitionError {
    #[error("column '{0}' is declared more than once")]
    DuplicateColumn(String),
}
