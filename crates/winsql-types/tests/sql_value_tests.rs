use winsql_types::{DataType, Date, SqlValue, Timestamp};

#[test]
fn test_get_type_and_type_name() {
    assert_eq!(SqlValue::Integer(1).get_type(), DataType::Integer);
    assert_eq!(SqlValue::Numeric(1.0).get_type(), DataType::Numeric);
    assert_eq!(SqlValue::from("x").type_name(), "VARCHAR");
    assert_eq!(SqlValue::Null.get_type(), DataType::Null);
}

#[test]
fn test_from_option() {
    assert_eq!(SqlValue::from(Some(5i64)), SqlValue::Integer(5));
    assert_eq!(SqlValue::from(None::<i64>), SqlValue::Null);
}

#[test]
fn test_as_date_covers_timestamps() {
    let ts: Timestamp = "2024-05-06 23:59:59".parse().unwrap();
    assert_eq!(SqlValue::Timestamp(ts).as_date(), Some(Date::new(2024, 5, 6).unwrap()));
    assert_eq!(SqlValue::Integer(3).as_date(), None);
}

#[test]
fn test_column_type_compatibility() {
    assert!(DataType::Numeric.is_compatible_with(&SqlValue::Integer(1)));
    assert!(DataType::Date.is_compatible_with(&SqlValue::Null));
    assert!(!DataType::Integer.is_compatible_with(&SqlValue::from("1")));
}

#[test]
fn test_serde_round_trip() {
    let values = vec![
        SqlValue::Integer(7),
        SqlValue::from("abc"),
        SqlValue::Date(Date::new(2020, 2, 29).unwrap()),
        SqlValue::Null,
    ];
    let json = serde_json::to_string(&values).unwrap();
    assert!(json.contains("2020-02-29"));
    let back: Vec<SqlValue> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, values);
}
