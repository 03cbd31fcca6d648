//! Error taxonomy for evaluation runs
//!
//! Every failure is one of two kinds:
//! - [`SchemaError`]: the request names something the relation doesn't have,
//!   or combines types that can't be combined.
//! - [`SpecError`]: the request itself is malformed, independent of any data.
//!
//! Both are detected before any row is touched, with one exception:
//! [`SpecError::AmbiguousPivotCell`] depends on the data.

use winsql_storage::{RowValidationError, SchemaDefinitionError};
use winsql_types::{DataType, TypeMismatch};

/// Any failure of an evaluation run
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Spec(#[from] SpecError),
}

impl CoreError {
    pub fn is_schema_error(&self) -> bool {
        matches!(self, CoreError::Schema(_))
    }

    pub fn is_spec_error(&self) -> bool {
        matches!(self, CoreError::Spec(_))
    }
}

/// The request doesn't fit the relation's shape or types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("column '{column}' not found (available columns: {})", .available_columns.join(", "))]
    ColumnNotFound { column: String, available_columns: Vec<String> },

    #[error("column '{column}' has type {found}, expected {expected}")]
    TypeMismatch { column: String, expected: String, found: DataType },

    #[error("type mismatch: {left} {op} {right}")]
    OperandTypeMismatch { left: DataType, op: String, right: DataType },

    #[error("column '{0}' already exists")]
    DuplicateColumn(String),

    #[error("invalid row: {0}")]
    InvalidRow(#[from] RowValidationError),
}

impl From<TypeMismatch> for SchemaError {
    fn from(err: TypeMismatch) -> Self {
        SchemaError::OperandTypeMismatch { left: err.left, op: err.op.to_string(), right: err.right }
    }
}

impl From<SchemaDefinitionError> for SchemaError {
    fn from(err: SchemaDefinitionError) -> Self {
        match err {
            SchemaDefinitionError::DuplicateColumn(name) => SchemaError::DuplicateColumn(name),
        }
    }
}

impl From<TypeMismatch> for CoreError {
    fn from(err: TypeMismatch) -> Self {
        CoreError::Schema(err.into())
    }
}

impl From<SchemaDefinitionError> for CoreError {
    fn from(err: SchemaDefinitionError) -> Self {
        CoreError::Schema(err.into())
    }
}

impl From<RowValidationError> for CoreError {
    fn from(err: RowValidationError) -> Self {
        CoreError::Schema(err.into())
    }
}

/// The request is malformed regardless of the data
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpecError {
    #[error("sliding frame size must be positive, got {0}")]
    InvalidSlidingFrame(usize),

    #[error("invalid frame: ROWS BETWEEN {start} AND {end}")]
    InvalidFrameBounds { start: String, end: String },

    #[error("{function} offset must be non-negative, got {offset}")]
    NegativeOffset { function: String, offset: i64 },

    #[error("NTILE argument must be positive, got {0}")]
    InvalidNtile(i64),

    #[error("NTH_VALUE position must be positive, got {0}")]
    InvalidNthValue(i64),

    #[error("{function} requires ORDER BY in the window")]
    OrderRequired { function: String },

    #[error("{function} requires a column argument")]
    MissingAggregateColumn { function: String },

    #[error("pivot requires at least one category")]
    EmptyPivotCategories,

    #[error("pivot category value must not be NULL (column '{0}')")]
    NullPivotCategory(String),

    #[error("pivot category {0} listed more than once")]
    DuplicatePivotCategory(String),

    #[error("group ({group}) has more than one row for pivot column '{category}'; supply an aggregate")]
    AmbiguousPivotCell { group: String, category: String },

    #[error("unpivot requires at least one value column")]
    EmptyUnpivotColumns,

    #[error("projection must select at least one column")]
    EmptyProjection,
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Build a `ColumnNotFound` error listing the columns that do exist
pub(crate) fn column_not_found(column: &str, available: &[String]) -> SchemaError {
    SchemaError::ColumnNotFound { column: column.to_string(), available_columns: available.to_vec() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winsql_types::ArithmeticOp;

    #[test]
    fn test_column_not_found_lists_available() {
        let err = column_not_found("salary", &["id".to_string(), "name".to_string()]);
        assert_eq!(err.to_string(), "column 'salary' not found (available columns: id, name)");
    }

    #[test]
    fn test_type_mismatch_converts_to_schema_error() {
        let err: CoreError = TypeMismatch {
            left: DataType::Varchar,
            op: ArithmeticOp::Add,
            right: DataType::Integer,
        }
        .into();
        assert!(err.is_schema_error());
        assert_eq!(err.to_string(), "type mismatch: VARCHAR + INTEGER");
    }

    #[test]
    fn test_spec_error_display() {
        let err = CoreError::from(SpecError::InvalidSlidingFrame(0));
        assert!(err.is_spec_error());
        assert_eq!(err.to_string(), "sliding frame size must be positive, got 0");
    }
}
