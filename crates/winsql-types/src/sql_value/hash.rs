//! Hash implementation for SqlValue

use std::hash::{Hash, Hasher};

use crate::sql_value::SqlValue;

/// Hash implementation for SqlValue
///
/// Consistent with the grouping equality in `comparison.rs`:
/// - all NaN values hash the same
/// - 0.0 and -0.0 hash the same
/// - NULL hashes to its discriminant only
impl Hash for SqlValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        use SqlValue::*;

        std::mem::discriminant(self).hash(state);

        match self {
            Integer(i) => i.hash(state),
            Numeric(f) => {
                let canonical = if f.is_nan() {
                    f64::NAN
                } else if *f == 0.0 {
                    0.0
                } else {
                    *f
                };
                canonical.to_bits().hash(state);
            }
            Varchar(s) => s.hash(state),
            Boolean(b) => b.hash(state),
            Date(d) => d.hash(state),
            Timestamp(ts) => ts.hash(state),
            Null => {}
        }
    }
}
