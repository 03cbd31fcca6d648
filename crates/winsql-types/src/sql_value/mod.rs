//! SQL Value runtime representation

mod arithmetic;
mod comparison;
mod display;
mod hash;

use serde::{Deserialize, Serialize};

pub use arithmetic::{ArithmeticOp, TypeMismatch};

use crate::{DataType, Date, Timestamp};

/// SQL Values - runtime representation of data
///
/// Represents actual values in a relation, including NULL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SqlValue {
    Integer(i64),
    Numeric(f64),
    Varchar(String),
    Boolean(bool),
    Date(Date),
    Timestamp(Timestamp),
    Null,
}

impl SqlValue {
    /// Check if this value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Get the type name as a string (for error messages)
    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Integer(_) => "INTEGER",
            SqlValue::Numeric(_) => "NUMERIC",
            SqlValue::Varchar(_) => "VARCHAR",
            SqlValue::Boolean(_) => "BOOLEAN",
            SqlValue::Date(_) => "DATE",
            SqlValue::Timestamp(_) => "TIMESTAMP",
            SqlValue::Null => "NULL",
        }
    }

    /// Get the data type of this value
    pub fn get_type(&self) -> DataType {
        match self {
            SqlValue::Integer(_) => DataType::Integer,
            SqlValue::Numeric(_) => DataType::Numeric,
            SqlValue::Varchar(_) => DataType::Varchar,
            SqlValue::Boolean(_) => DataType::Boolean,
            SqlValue::Date(_) => DataType::Date,
            SqlValue::Timestamp(_) => DataType::Timestamp,
            SqlValue::Null => DataType::Null,
        }
    }

    /// Numeric view of the value (integers widen to f64)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Integer(i) => Some(*i as f64),
            SqlValue::Numeric(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Varchar(s) => Some(s),
            _ => None,
        }
    }

    /// Calendar date of a DATE or TIMESTAMP value
    pub fn as_date(&self) -> Option<Date> {
        match self {
            SqlValue::Date(d) => Some(*d),
            SqlValue::Timestamp(ts) => Some(ts.date()),
            _ => None,
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Numeric(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Boolean(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Varchar(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Varchar(value)
    }
}

impl From<Date> for SqlValue {
    fn from(value: Date) -> Self {
        SqlValue::Date(value)
    }
}

impl From<Timestamp> for SqlValue {
    fn from(value: Timestamp) -> Self {
        SqlValue::Timestamp(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}
