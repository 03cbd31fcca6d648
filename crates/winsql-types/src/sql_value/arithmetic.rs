//! NULL-propagating arithmetic for SqlValue
//!
//! - Any NULL operand yields NULL.
//! - INTEGER op INTEGER stays INTEGER for `+ - *`; overflow widens to NUMERIC.
//! - `/` always yields NUMERIC. A zero denominator yields NULL, never an error.
//! - DATE - DATE yields INTEGER days; DATE +/- INTEGER yields DATE.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{sql_value::SqlValue, DataType};

/// Arithmetic operators supported on values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Subtract => "-",
            ArithmeticOp::Multiply => "*",
            ArithmeticOp::Divide => "/",
        };
        write!(f, "{}", symbol)
    }
}

/// Operand types an arithmetic operator is not defined for
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("type mismatch: {left} {op} {right}")]
pub struct TypeMismatch {
    pub left: DataType,
    pub op: ArithmeticOp,
    pub right: DataType,
}

impl ArithmeticOp {
    /// Static result type of `left op right`.
    ///
    /// An untyped NULL operand takes on whatever type makes the expression valid.
    pub fn result_type(self, left: DataType, right: DataType) -> Result<DataType, TypeMismatch> {
        use ArithmeticOp::*;
        use DataType::*;

        let mismatch = || TypeMismatch { left, op: self, right };

        let result = match (self, left, right) {
            (Divide, l, r) if (l.is_numeric() || l == Null) && (r.is_numeric() || r == Null) => {
                Numeric
            }
            (_, Null, Null) => Null,
            (_, Integer, Integer) | (_, Integer, Null) | (_, Null, Integer) => Integer,
            (_, l, r) if (l.is_numeric() || l == Null) && (r.is_numeric() || r == Null) => Numeric,
            (Add | Subtract, Date, Integer) | (Add | Subtract, Date, Null) => Date,
            (Add, Integer, Date) | (Add, Null, Date) => Date,
            (Subtract, Date, Date) | (Subtract, Null, Date) => Integer,
            _ => return Err(mismatch()),
        };
        Ok(result)
    }
}

impl SqlValue {
    /// Apply `op` to two values
    pub fn arithmetic(&self, op: ArithmeticOp, other: &SqlValue) -> Result<SqlValue, TypeMismatch> {
        use SqlValue::*;

        op.result_type(self.get_type(), other.get_type())?;

        let value = match (op, self, other) {
            (_, Null, _) | (_, _, Null) => Null,

            (ArithmeticOp::Divide, l, r) => match (l.as_f64(), r.as_f64()) {
                (Some(_), Some(d)) if d == 0.0 => Null,
                (Some(n), Some(d)) => Numeric(n / d),
                _ => Null,
            },

            (ArithmeticOp::Add, Integer(a), Integer(b)) => {
                a.checked_add(*b).map_or(Numeric(*a as f64 + *b as f64), Integer)
            }
            (ArithmeticOp::Subtract, Integer(a), Integer(b)) => {
                a.checked_sub(*b).map_or(Numeric(*a as f64 - *b as f64), Integer)
            }
            (ArithmeticOp::Multiply, Integer(a), Integer(b)) => {
                a.checked_mul(*b).map_or(Numeric(*a as f64 * *b as f64), Integer)
            }

            (ArithmeticOp::Add, Date(d), Integer(n)) | (ArithmeticOp::Add, Integer(n), Date(d)) => {
                d.add_days(*n).map_or(Null, Date)
            }
            (ArithmeticOp::Subtract, Date(d), Integer(n)) => {
                n.checked_neg().and_then(|neg| d.add_days(neg)).map_or(Null, Date)
            }
            (ArithmeticOp::Subtract, Date(a), Date(b)) => Integer(a.days_since(b)),

            (op, l, r) => match (l.as_f64(), r.as_f64()) {
                (Some(a), Some(b)) => Numeric(match op {
                    ArithmeticOp::Add => a + b,
                    ArithmeticOp::Subtract => a - b,
                    ArithmeticOp::Multiply => a * b,
                    ArithmeticOp::Divide => a / b,
                }),
                _ => {
                    return Err(TypeMismatch {
                        left: l.get_type(),
                        op,
                        right: r.get_type(),
                    })
                }
            },
        };

        Ok(value)
    }

    pub fn add(&self, other: &SqlValue) -> Result<SqlValue, TypeMismatch> {
        self.arithmetic(ArithmeticOp::Add, other)
    }

    pub fn subtract(&self, other: &SqlValue) -> Result<SqlValue, TypeMismatch> {
        self.arithmetic(ArithmeticOp::Subtract, other)
    }

    pub fn multiply(&self, other: &SqlValue) -> Result<SqlValue, TypeMismatch> {
        self.arithmetic(ArithmeticOp::Multiply, other)
    }

    /// Safe division: NULL for a zero or NULL denominator
    pub fn divide(&self, other: &SqlValue) -> Result<SqlValue, TypeMismatch> {
        self.arithmetic(ArithmeticOp::Divide, other)
    }

    /// Unary minus (0 - value)
    pub fn negate(&self) -> Result<SqlValue, TypeMismatch> {
        match self {
            SqlValue::Integer(i) => {
                Ok(i.checked_neg().map_or(SqlValue::Numeric(-(*i as f64)), SqlValue::Integer))
            }
            SqlValue::Numeric(n) => Ok(SqlValue::Numeric(-n)),
            SqlValue::Null => Ok(SqlValue::Null),
            other => Err(TypeMismatch {
                left: DataType::Integer,
                op: ArithmeticOp::Subtract,
                right: other.get_type(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Date;

    #[test]
    fn test_integer_arithmetic_stays_integer() {
        assert_eq!(SqlValue::Integer(2).add(&SqlValue::Integer(3)), Ok(SqlValue::Integer(5)));
        assert_eq!(SqlValue::Integer(2).multiply(&SqlValue::Integer(3)), Ok(SqlValue::Integer(6)));
    }

    #[test]
    fn test_overflow_widens() {
        let result = SqlValue::Integer(i64::MAX).add(&SqlValue::Integer(1)).unwrap();
        assert!(matches!(result, SqlValue::Numeric(_)));
    }

    #[test]
    fn test_null_propagates() {
        assert_eq!(SqlValue::Null.add(&SqlValue::Integer(1)), Ok(SqlValue::Null));
        assert_eq!(SqlValue::Numeric(1.5).multiply(&SqlValue::Null), Ok(SqlValue::Null));
    }

    #[test]
    fn test_division_by_zero_is_null() {
        assert_eq!(SqlValue::Integer(10).divide(&SqlValue::Integer(0)), Ok(SqlValue::Null));
        assert_eq!(SqlValue::Numeric(1.0).divide(&SqlValue::Numeric(0.0)), Ok(SqlValue::Null));
        assert_eq!(SqlValue::Integer(10).divide(&SqlValue::Null), Ok(SqlValue::Null));
        assert_eq!(SqlValue::Integer(10).divide(&SqlValue::Integer(4)), Ok(SqlValue::Numeric(2.5)));
    }

    #[test]
    fn test_date_arithmetic() {
        let d1 = SqlValue::Date(Date::new(2024, 1, 31).unwrap());
        let d2 = SqlValue::Date(Date::new(2024, 2, 2).unwrap());
        assert_eq!(d2.subtract(&d1), Ok(SqlValue::Integer(2)));
        assert_eq!(d1.add(&SqlValue::Integer(2)), Ok(d2.clone()));
        assert_eq!(d2.subtract(&SqlValue::Integer(2)), Ok(d1));
    }

    #[test]
    fn test_type_mismatch() {
        let err = SqlValue::from("a").add(&SqlValue::Integer(1)).unwrap_err();
        assert_eq!(err.left, DataType::Varchar);
        assert_eq!(err.op, ArithmeticOp::Add);
        assert!(ArithmeticOp::Multiply.result_type(DataType::Date, DataType::Integer).is_err());
    }

    #[test]
    fn test_result_types() {
        assert_eq!(
            ArithmeticOp::Divide.result_type(DataType::Integer, DataType::Integer),
            Ok(DataType::Numeric)
        );
        assert_eq!(
            ArithmeticOp::Subtract.result_type(DataType::Date, DataType::Date),
            Ok(DataType::Integer)
        );
        assert_eq!(
            ArithmeticOp::Add.result_type(DataType::Integer, DataType::Numeric),
            Ok(DataType::Numeric)
        );
    }

    #[test]
    fn test_null_operand_with_date() {
        let day = SqlValue::Date(Date::new(2024, 1, 31).unwrap());
        assert_eq!(
            ArithmeticOp::Subtract.result_type(DataType::Null, DataType::Date),
            Ok(DataType::Integer)
        );
        assert_eq!(SqlValue::Null.subtract(&day), Ok(SqlValue::Null));
        assert_eq!(day.subtract(&SqlValue::Null), Ok(SqlValue::Null));
        assert_eq!(SqlValue::Null.add(&day), Ok(SqlValue::Null));
    }
}
