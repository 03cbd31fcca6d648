use winsql_ast::{
    AggregateFunction, ComputationRequest, Contiguity, Expression, FrameSpec, IslandSpec,
    OrderByItem, PivotSpec, ProjectionItem, WindowFunction, WindowFunctionCall, WindowSpec,
};
use winsql_storage::{ColumnSchema, Relation, RelationSchema, Row};
use winsql_types::{DataType, Date, SqlValue};

use super::{evaluate, evaluate_with_options, ExecutionPlan, PipelineState};
use crate::{
    errors::{CoreError, SchemaError, SpecError},
    parallel::EvaluatorOptions,
};

fn employees() -> Relation {
    let schema = RelationSchema::new(vec![
        ColumnSchema::new("id", DataType::Integer, false),
        ColumnSchema::new("dept", DataType::Varchar, false),
        ColumnSchema::new("name", DataType::Varchar, false),
        ColumnSchema::nullable("salary", DataType::Integer),
    ])
    .unwrap();
    let rows = [
        (1, "IT", "ann", Some(55000)),
        (2, "HR", "bob", Some(40000)),
        (3, "IT", "cat", Some(65000)),
        (4, "HR", "dan", Some(45000)),
        (5, "IT", "eve", Some(65000)),
        (6, "HR", "fay", None),
    ]
    .into_iter()
    .map(|(id, dept, name, salary): (i64, &str, &str, Option<i64>)| {
        Row::new(vec![id.into(), dept.into(), name.into(), salary.into()])
    })
    .collect();
    Relation::try_new(schema, rows).unwrap()
}

fn salary_window() -> WindowSpec {
    WindowSpec::new().partition_by(["dept"]).order_by(vec![OrderByItem::desc("salary")])
}

fn column(relation: &Relation, name: &str) -> Vec<SqlValue> {
    relation.column_values(name).unwrap().into_iter().cloned().collect()
}

fn ints(values: &[i64]) -> Vec<SqlValue> {
    values.iter().map(|v| SqlValue::Integer(*v)).collect()
}

fn date(month: u32, day: u32) -> SqlValue {
    SqlValue::Date(Date::new(2024, month, day).unwrap())
}

#[test]
fn test_window_results_keep_input_order() {
    let request = ComputationRequest::new()
        .window(salary_window())
        .function(WindowFunctionCall::new("rnk", WindowFunction::DenseRank));

    let result = evaluate(&employees(), &request).unwrap();

    assert_eq!(result.schema().column_names(), vec!["id", "dept", "name", "salary", "rnk"]);
    assert_eq!(column(&result, "id"), ints(&[1, 2, 3, 4, 5, 6]));
    // NULL salary sorts first under DESC
    assert_eq!(column(&result, "rnk"), ints(&[2, 3, 1, 2, 1, 1]));
}

#[test]
fn test_filter_project_and_sort_window_output() {
    let request = ComputationRequest::new()
        .window(salary_window())
        .function(WindowFunctionCall::new("rnk", WindowFunction::DenseRank))
        .filter(Expression::column("rnk").equal(Expression::literal(2)))
        .project(vec![ProjectionItem::column("dept"), ProjectionItem::column("name")])
        .sort_by(vec![OrderByItem::asc("dept")]);

    let result = evaluate(&employees(), &request).unwrap();

    assert_eq!(
        result.rows(),
        &[Row::new(vec!["HR".into(), "dan".into()]), Row::new(vec!["IT".into(), "ann".into()])]
    );
}

#[test]
fn test_planned_stages() {
    let schema = employees().schema().clone();

    let filter_only =
        ComputationRequest::new().filter(Expression::column("salary").is_not_null());
    assert_eq!(
        ExecutionPlan::new(&filter_only, &schema).unwrap().stages(),
        &[PipelineState::Scanned, PipelineState::PostFiltered, PipelineState::Done]
    );

    let everything = ComputationRequest::new()
        .window(salary_window())
        .function(WindowFunctionCall::new("rn", WindowFunction::RowNumber))
        .filter(Expression::column("rn").less_than_or_equal(Expression::literal(2)))
        .pivot(PivotSpec::new(["dept"], "rn", "name").category(1, "first").category(2, "second"))
        .project(vec![ProjectionItem::column("dept"), ProjectionItem::column("second")])
        .sort_by(vec![OrderByItem::asc("dept")]);
    let plan = ExecutionPlan::new(&everything, &schema).unwrap();
    assert_eq!(plan.stages(), &PipelineState::ALL);
    assert_eq!(plan.output_schema().column_names(), vec!["dept", "second"]);
}

#[test]
fn test_pivot_after_window() {
    let request = ComputationRequest::new()
        .window(salary_window())
        .function(WindowFunctionCall::new("rn", WindowFunction::RowNumber))
        .pivot(PivotSpec::new(["dept"], "rn", "name").category(1, "first").category(2, "second"));

    let result = evaluate(&employees(), &request).unwrap();

    // groups appear in input order of their first row
    assert_eq!(
        result.rows(),
        &[
            Row::new(vec!["IT".into(), "cat".into(), "eve".into()]),
            Row::new(vec!["HR".into(), "fay".into(), "dan".into()]),
        ]
    );
}

#[test]
fn test_errors_surface_before_rows() {
    let empty = Relation::empty(employees().schema().clone());

    let unknown_sort = ComputationRequest::new().sort_by(vec![OrderByItem::asc("bonus")]);
    assert!(matches!(
        evaluate(&empty, &unknown_sort),
        Err(CoreError::Schema(SchemaError::ColumnNotFound { column, .. })) if column == "bonus"
    ));

    let not_boolean = ComputationRequest::new().filter(Expression::column("salary"));
    assert!(matches!(
        evaluate(&empty, &not_boolean),
        Err(CoreError::Schema(SchemaError::TypeMismatch { found: DataType::Integer, .. }))
    ));

    let colliding = ComputationRequest::new()
        .window(salary_window())
        .function(WindowFunctionCall::new("salary", WindowFunction::RowNumber));
    assert_eq!(
        evaluate(&empty, &colliding),
        Err(SchemaError::DuplicateColumn("salary".into()).into())
    );

    let sliding_zero = ComputationRequest::new()
        .window(salary_window())
        .function(
            WindowFunctionCall::new("s", WindowFunction::sum("salary"))
                .with_frame(FrameSpec::Sliding(0)),
        );
    assert_eq!(evaluate(&empty, &sliding_zero), Err(SpecError::InvalidSlidingFrame(0).into()));

    let no_columns = ComputationRequest::new().project(Vec::new());
    assert_eq!(evaluate(&empty, &no_columns), Err(SpecError::EmptyProjection.into()));
}

#[test]
fn test_sort_refers_to_projected_columns() {
    let request = ComputationRequest::new()
        .project(vec![ProjectionItem::column("name")])
        .sort_by(vec![OrderByItem::asc("salary")]);

    let err = evaluate(&employees(), &request).unwrap_err();
    assert!(matches!(err, CoreError::Schema(SchemaError::ColumnNotFound { .. })));
}

#[test]
fn test_distinct_sort_and_limit() {
    let request = ComputationRequest::new()
        .project(vec![ProjectionItem::column("dept")])
        .distinct()
        .sort_by(vec![OrderByItem::asc("dept")])
        .limit(1);

    let result = evaluate(&employees(), &request).unwrap();
    assert_eq!(result.rows(), &[Row::new(vec!["HR".into()])]);
}

#[test]
fn test_projection_expressions() {
    let request = ComputationRequest::new()
        .filter(Expression::column("dept").equal(Expression::literal("HR")))
        .project(vec![
            ProjectionItem::column("name"),
            ProjectionItem::aliased(
                Expression::column("salary").divide(Expression::literal(1000)),
                "salary_k",
            ),
        ]);

    let result = evaluate(&employees(), &request).unwrap();
    assert_eq!(result.schema().columns()[1].data_type, DataType::Numeric);
    assert_eq!(
        column(&result, "salary_k"),
        vec![SqlValue::Numeric(40.0), SqlValue::Numeric(45.0), SqlValue::Null]
    );
}

#[test]
fn test_runs_of_three_through_pipeline() {
    let schema = RelationSchema::new(vec![
        ColumnSchema::new("id", DataType::Integer, false),
        ColumnSchema::new("num", DataType::Integer, false),
    ])
    .unwrap();
    let rows = [1, 1, 1, 2, 1, 2, 2]
        .into_iter()
        .enumerate()
        .map(|(idx, num)| {
            Row::new(vec![SqlValue::Integer(idx as i64 + 1), SqlValue::Integer(num)])
        })
        .collect();
    let logs = Relation::try_new(schema, rows).unwrap();

    let request = ComputationRequest::new()
        .window(WindowSpec::new().order_by(vec![OrderByItem::asc("id")]))
        .islands(IslandSpec::new("num", Contiguity::EqualValue).min_length(3))
        .project(vec![ProjectionItem::column("id"), ProjectionItem::column("run_length")]);

    let result = evaluate(&logs, &request).unwrap();
    assert_eq!(column(&result, "id"), ints(&[1, 2, 3]));
    assert_eq!(column(&result, "run_length"), ints(&[3, 3, 3]));
}

#[test]
fn test_grouped_day_islands() {
    let schema = RelationSchema::new(vec![
        ColumnSchema::new("user", DataType::Varchar, false),
        ColumnSchema::new("day", DataType::Date, false),
    ])
    .unwrap();
    let rows = vec![
        Row::new(vec!["u2".into(), date(1, 11)]),
        Row::new(vec!["u1".into(), date(1, 2)]),
        Row::new(vec!["u1".into(), date(1, 1)]),
        Row::new(vec!["u1".into(), date(1, 5)]),
        Row::new(vec!["u2".into(), date(1, 10)]),
        Row::new(vec!["u1".into(), date(1, 3)]),
    ];
    let logins = Relation::try_new(schema, rows).unwrap();

    let request = ComputationRequest::new()
        .window(WindowSpec::new().partition_by(["user"]))
        .islands(IslandSpec::new("day", Contiguity::DaySuccessor).groups());

    let result = evaluate(&logins, &request).unwrap();
    assert_eq!(
        result.schema().column_names(),
        vec!["user", "island_id", "run_start", "run_end", "run_length", "member_count"]
    );
    assert_eq!(
        result.rows(),
        &[
            Row::new(vec!["u1".into(), 1.into(), date(1, 1), date(1, 3), 3.into(), 3.into()]),
            Row::new(vec!["u1".into(), 2.into(), date(1, 5), date(1, 5), 1.into(), 1.into()]),
            Row::new(vec!["u2".into(), 1.into(), date(1, 10), date(1, 11), 2.into(), 2.into()]),
        ]
    );

    let longest = request
        .clone()
        .islands(IslandSpec::new("day", Contiguity::DaySuccessor).groups().min_length(2));
    assert_eq!(evaluate(&logins, &longest).unwrap().len(), 2);
}

#[test]
fn test_integer_overflow_widens_output_column() {
    let schema =
        RelationSchema::new(vec![ColumnSchema::new("x", DataType::Integer, false)]).unwrap();
    let rows =
        vec![Row::new(vec![SqlValue::Integer(i64::MAX)]), Row::new(vec![SqlValue::Integer(1)])];
    let relation = Relation::try_new(schema, rows).unwrap();

    let request = ComputationRequest::new()
        .window(WindowSpec::new().order_by(vec![OrderByItem::asc("x")]))
        .function(WindowFunctionCall::new("total", WindowFunction::sum("x")));

    let result = evaluate(&relation, &request).unwrap();
    assert_eq!(result.schema().columns()[1].data_type, DataType::Numeric);
    assert_eq!(result.get(1, "total"), Some(&SqlValue::Numeric(1.0)));
    assert!(matches!(result.get(0, "total"), Some(SqlValue::Numeric(_))));
}

#[test]
fn test_empty_relation_keeps_schema() {
    let empty = Relation::empty(employees().schema().clone());
    let request = ComputationRequest::new()
        .window(salary_window())
        .function(WindowFunctionCall::new("prev", WindowFunction::lag("salary", 1)))
        .islands(IslandSpec::new("salary", Contiguity::IntegerSuccessor));

    let result = evaluate(&empty, &request).unwrap();
    assert!(result.is_empty());
    assert_eq!(
        result.schema().column_names(),
        vec!["id", "dept", "name", "salary", "prev", "island_id", "run_length"]
    );
}

#[test]
fn test_parallel_and_sequential_agree() {
    let schema = RelationSchema::new(vec![
        ColumnSchema::new("grp", DataType::Integer, false),
        ColumnSchema::new("val", DataType::Integer, false),
    ])
    .unwrap();
    let rows = (0..500i64)
        .map(|i| Row::new(vec![SqlValue::Integer(i % 7), SqlValue::Integer((i * 37) % 101)]))
        .collect();
    let relation = Relation::try_new(schema, rows).unwrap();

    let request = ComputationRequest::new()
        .window(WindowSpec::new().partition_by(["grp"]).order_by(vec![OrderByItem::asc("val")]))
        .function(WindowFunctionCall::new("rnk", WindowFunction::Rank))
        .function(WindowFunctionCall::new("running", WindowFunction::sum("val")))
        .function(
            WindowFunctionCall::new(
                "avg3",
                WindowFunction::aggregate(AggregateFunction::Avg, "val"),
            )
            .with_frame(FrameSpec::Sliding(3)),
        )
        .function(WindowFunctionCall::new("next", WindowFunction::lead("val", 2)))
        .filter(Expression::column("rnk").greater_than(Expression::literal(3)))
        .sort_by(vec![OrderByItem::desc("running")]);

    let sequential =
        evaluate_with_options(&relation, &request, &EvaluatorOptions::sequential()).unwrap();
    let parallel =
        evaluate_with_options(&relation, &request, &EvaluatorOptions::parallel()).unwrap();
    assert_eq!(sequential, parallel);
    assert!(!sequential.is_empty());
}
