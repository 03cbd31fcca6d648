use winsql_ast::{NullsOrder, OrderDirection};
use winsql_storage::Row;
use winsql_types::SqlValue;

use super::SortKey;

mod ranking;

fn make_test_rows(values: Vec<i64>) -> Vec<Row> {
    values.into_iter().map(|v| Row::new(vec![SqlValue::Integer(v)])).collect()
}

fn make_nullable_rows(values: Vec<Option<i64>>) -> Vec<Row> {
    values.into_iter().map(|v| Row::new(vec![SqlValue::from(v)])).collect()
}

fn asc(column: usize) -> SortKey {
    SortKey { column, direction: OrderDirection::Asc, nulls: NullsOrder::Last }
}

fn desc(column: usize) -> SortKey {
    SortKey { column, direction: OrderDirection::Desc, nulls: NullsOrder::First }
}

fn ints(values: &[i64]) -> Vec<SqlValue> {
    values.iter().map(|v| SqlValue::Integer(*v)).collect()
}
