use winsql_storage::{ColumnSchema, Relation, RelationSchema, Row, RowValidationError};
use winsql_types::{DataType, SqlValue};

fn employee_schema() -> RelationSchema {
    RelationSchema::new(vec![
        ColumnSchema::new("name", DataType::Varchar, false),
        ColumnSchema::nullable("dept", DataType::Varchar),
        ColumnSchema::nullable("salary", DataType::Numeric),
    ])
    .unwrap()
}

#[test]
fn test_valid_relation() {
    let relation = Relation::try_new(
        employee_schema(),
        vec![
            Row::new(vec!["ann".into(), "IT".into(), SqlValue::Numeric(10.5)]),
            Row::new(vec!["bob".into(), SqlValue::Null, SqlValue::Null]),
        ],
    )
    .unwrap();

    assert_eq!(relation.len(), 2);
    assert_eq!(relation.get(1, "dept"), Some(&SqlValue::Null));
    assert_eq!(relation.column_values("name").unwrap().len(), 2);
    assert!(relation.column_values("missing").is_none());
}

#[test]
fn test_integer_widens_into_numeric_column() {
    let relation = Relation::try_new(
        employee_schema(),
        vec![Row::new(vec!["ann".into(), "IT".into(), SqlValue::Integer(55000)])],
    )
    .unwrap();

    assert_eq!(relation.get(0, "salary"), Some(&SqlValue::Numeric(55000.0)));
}

#[test]
fn test_arity_mismatch() {
    let err = Relation::try_new(employee_schema(), vec![Row::new(vec!["ann".into()])])
        .unwrap_err();
    assert_eq!(err, RowValidationError::ArityMismatch { row: 0, expected: 3, provided: 1 });
}

#[test]
fn test_type_mismatch_reports_column() {
    let err = Relation::try_new(
        employee_schema(),
        vec![Row::new(vec!["ann".into(), SqlValue::Integer(1), SqlValue::Null])],
    )
    .unwrap_err();
    assert_eq!(
        err,
        RowValidationError::TypeMismatch {
            row: 0,
            column: "dept".to_string(),
            expected: DataType::Varchar,
            found: DataType::Integer,
        }
    );
}

#[test]
fn test_null_in_non_nullable_column() {
    let err = Relation::try_new(
        employee_schema(),
        vec![Row::new(vec![SqlValue::Null, SqlValue::Null, SqlValue::Null])],
    )
    .unwrap_err();
    assert!(matches!(err, RowValidationError::NullViolation { row: 0, .. }));
}

#[test]
fn test_from_row_iter_streams_rows() {
    let schema = RelationSchema::new(vec![ColumnSchema::nullable("n", DataType::Integer)]).unwrap();
    let relation =
        Relation::from_row_iter(schema, (1..=5).map(|n| Row::new(vec![SqlValue::Integer(n)])))
            .unwrap();
    assert_eq!(relation.len(), 5);
}

#[test]
fn test_schema_deserializes_with_default_nullability() {
    let schema: RelationSchema = serde_json::from_str(
        r#"[{"name": "id", "data_type": "Integer", "nullable": false},
            {"name": "note", "data_type": "Varchar"}]"#,
    )
    .unwrap();
    assert!(!schema.columns()[0].nullable);
    assert!(schema.columns()[1].nullable);

    let duplicate: Result<RelationSchema, _> = serde_json::from_str(
        r#"[{"name": "id", "data_type": "Integer"}, {"name": "id", "data_type": "Integer"}]"#,
    );
    assert!(duplicate.is_err());
}
