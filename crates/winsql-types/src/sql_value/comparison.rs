//! Comparison implementations for SqlValue
//!
//! Two notions of comparison live here:
//! - `sql_cmp` / `sql_equals`: SQL three-valued semantics, where anything involving
//!   NULL is UNKNOWN (`None`).
//! - `Eq` / `Ord`: grouping semantics, where NULL equals NULL. Partition keys,
//!   pivot group keys and map keys use these.

use std::cmp::Ordering;

use crate::sql_value::SqlValue;

/// Order two floats with NaN above every number and NaN == NaN
fn cmp_f64(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

impl SqlValue {
    /// SQL comparison.
    ///
    /// Returns None (UNKNOWN) if either side is NULL or the types are incomparable.
    /// INTEGER and NUMERIC compare numerically.
    pub fn sql_cmp(&self, other: &SqlValue) -> Option<Ordering> {
        use SqlValue::*;
        match (self, other) {
            (Null, _) | (_, Null) => None,
            (Integer(a), Integer(b)) => Some(a.cmp(b)),
            (Numeric(a), Numeric(b)) => Some(cmp_f64(*a, *b)),
            (Integer(a), Numeric(b)) => Some(cmp_f64(*a as f64, *b)),
            (Numeric(a), Integer(b)) => Some(cmp_f64(*a, *b as f64)),
            (Varchar(a), Varchar(b)) => Some(a.cmp(b)),
            // false < true
            (Boolean(a), Boolean(b)) => Some(a.cmp(b)),
            (Date(a), Date(b)) => Some(a.cmp(b)),
            (Timestamp(a), Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// SQL `=`: None when either side is NULL
    pub fn sql_equals(&self, other: &SqlValue) -> Option<bool> {
        self.sql_cmp(other).map(|ord| ord == Ordering::Equal)
    }

    fn type_tag(&self) -> u8 {
        match self {
            SqlValue::Null => 0,
            SqlValue::Integer(_) => 1,
            SqlValue::Numeric(_) => 2,
            SqlValue::Varchar(_) => 3,
            SqlValue::Boolean(_) => 4,
            SqlValue::Date(_) => 5,
            SqlValue::Timestamp(_) => 6,
        }
    }
}

/// Grouping equality:
/// - NULL == NULL (unlike SQL comparison)
/// - NaN == NaN and 0.0 == -0.0
/// - values of different variants are never equal
impl PartialEq for SqlValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SqlValue {}

impl PartialOrd for SqlValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Total ordering used for deterministic map keys.
///
/// NULL sorts below everything, NaN above every other number, and values of
/// different variants order by type tag. This is not ORDER BY semantics.
impl Ord for SqlValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use SqlValue::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Numeric(a), Numeric(b)) => cmp_f64(*a, *b),
            (Varchar(a), Varchar(b)) => a.cmp(b),
            (Boolean(a), Boolean(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            (Timestamp(a), Timestamp(b)) => a.cmp(b),
            _ => self.type_tag().cmp(&other.type_tag()),
        }
    }
}
