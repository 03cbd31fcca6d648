//! User-facing rendering of values

use std::fmt;

use crate::sql_value::SqlValue;

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Integer(i) => write!(f, "{i}"),
            SqlValue::Numeric(n) if n.is_nan() => f.write_str("NaN"),
            SqlValue::Numeric(n) if n.is_infinite() => {
                f.write_str(if n.is_sign_positive() { "Infinity" } else { "-Infinity" })
            }
            // whole numbers print without a fraction while they stay out of exponent notation
            SqlValue::Numeric(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{n:.0}"),
            SqlValue::Numeric(n) => write!(f, "{n}"),
            SqlValue::Varchar(s) => f.write_str(s),
            SqlValue::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            SqlValue::Date(d) => fmt::Display::fmt(d, f),
            SqlValue::Timestamp(ts) => fmt::Display::fmt(ts, f),
        }
    }
}
