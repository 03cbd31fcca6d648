//! Column data type definitions

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::SqlValue;

/// Type of a relation column or expression result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    /// Float/decimal values, stored as f64
    Numeric,
    Varchar,
    Boolean,
    Date,
    Timestamp,
    /// Type of an untyped NULL literal
    Null,
}

impl DataType {
    /// Whether arithmetic aggregates (SUM, AVG) accept this type
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Numeric)
    }

    /// Whether values of type `other` may be stored in a column of this type.
    ///
    /// NULL is storable everywhere; integers widen into numeric columns.
    pub fn accepts(&self, other: DataType) -> bool {
        match (self, other) {
            (_, DataType::Null) => true,
            (DataType::Numeric, DataType::Integer) => true,
            (a, b) => *a == b,
        }
    }

    /// Whether `value` may be stored in a column of this type
    pub fn is_compatible_with(&self, value: &SqlValue) -> bool {
        self.accepts(value.get_type())
    }

    /// Common type of two operands, used for CASE/COALESCE branches.
    ///
    /// Returns None when the types cannot be unified.
    pub fn unify(self, other: DataType) -> Option<DataType> {
        match (self, other) {
            (DataType::Null, t) | (t, DataType::Null) => Some(t),
            (DataType::Integer, DataType::Numeric) | (DataType::Numeric, DataType::Integer) => {
                Some(DataType::Numeric)
            }
            (a, b) if a == b => Some(a),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Integer => "INTEGER",
            DataType::Numeric => "NUMERIC",
            DataType::Varchar => "VARCHAR",
            DataType::Boolean => "BOOLEAN",
            DataType::Date => "DATE",
            DataType::Timestamp => "TIMESTAMP",
            DataType::Null => "NULL",
        };
        write!(f, "{}", name)
    }
}
