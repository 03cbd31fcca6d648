//! Tests for the two comparison contracts of SqlValue:
//! three-valued SQL comparison and total grouping order

use std::{
    cmp::Ordering,
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use winsql_types::{Date, SqlValue};

fn calculate_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn sample_values() -> Vec<SqlValue> {
    vec![
        SqlValue::Null,
        SqlValue::Integer(0),
        SqlValue::Integer(42),
        SqlValue::Integer(-42),
        SqlValue::Numeric(0.0),
        SqlValue::Numeric(-0.0),
        SqlValue::Numeric(2.718),
        SqlValue::Numeric(f64::NAN),
        SqlValue::Varchar("hello".to_string()),
        SqlValue::Varchar("world".to_string()),
        SqlValue::Boolean(true),
        SqlValue::Boolean(false),
        SqlValue::Date(Date::new(2024, 1, 1).unwrap()),
        SqlValue::Timestamp("2024-01-01 10:00:00".parse().unwrap()),
    ]
}

/// Eq, Ord and Hash must agree for map keys to work:
/// a == b  <=>  a.cmp(b) == Equal, and a == b  =>  hash(a) == hash(b)
#[test]
fn test_eq_ord_hash_consistency() {
    let values = sample_values();
    for a in &values {
        for b in &values {
            let eq = a == b;
            assert_eq!(
                eq,
                a.cmp(b) == Ordering::Equal,
                "Eq/Ord inconsistency between {:?} and {:?}",
                a,
                b
            );
            if eq {
                assert_eq!(calculate_hash(a), calculate_hash(b), "hash mismatch for {:?}", a);
            }
        }
    }
}

#[test]
fn test_null_groups_with_null_but_compares_unknown() {
    assert_eq!(SqlValue::Null, SqlValue::Null);
    assert_eq!(SqlValue::Null.sql_cmp(&SqlValue::Null), None);
    assert_eq!(SqlValue::Null.sql_equals(&SqlValue::Integer(1)), None);
    assert_eq!(SqlValue::Integer(1).sql_cmp(&SqlValue::Null), None);
}

#[test]
fn test_null_sorts_lowest_in_total_order() {
    assert_eq!(SqlValue::Null.cmp(&SqlValue::Integer(i64::MIN)), Ordering::Less);
    assert_eq!(SqlValue::Varchar(String::new()).cmp(&SqlValue::Null), Ordering::Greater);
}

#[test]
fn test_numeric_cross_type_sql_comparison() {
    assert_eq!(SqlValue::Integer(2).sql_cmp(&SqlValue::Numeric(2.5)), Some(Ordering::Less));
    assert_eq!(SqlValue::Numeric(3.0).sql_equals(&SqlValue::Integer(3)), Some(true));
    // grouping equality keeps the variants apart
    assert_ne!(SqlValue::Numeric(3.0), SqlValue::Integer(3));
}

#[test]
fn test_nan_is_greatest_and_self_equal() {
    let nan = SqlValue::Numeric(f64::NAN);
    assert_eq!(nan, SqlValue::Numeric(f64::NAN));
    assert_eq!(nan.sql_cmp(&SqlValue::Numeric(f64::INFINITY)), Some(Ordering::Greater));
}

#[test]
fn test_incomparable_types_are_unknown() {
    assert_eq!(SqlValue::from("1").sql_cmp(&SqlValue::Integer(1)), None);
    assert_eq!(SqlValue::Boolean(true).sql_equals(&SqlValue::Integer(1)), None);
}

#[test]
fn test_btreemap_vec_keys() {
    use std::collections::BTreeMap;

    let mut map: BTreeMap<Vec<SqlValue>, usize> = BTreeMap::new();
    map.insert(vec![SqlValue::from("IT"), SqlValue::Null], 1);
    map.insert(vec![SqlValue::from("HR"), SqlValue::Integer(1)], 2);
    map.insert(vec![SqlValue::from("IT"), SqlValue::Null], 3);

    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&vec![SqlValue::from("IT"), SqlValue::Null]), Some(&3));
    let first = map.keys().next().unwrap();
    assert_eq!(first[0], SqlValue::from("HR"));
}
