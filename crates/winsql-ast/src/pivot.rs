//! Pivot (rows to columns) and unpivot (columns to rows) requests

use serde::{Deserialize, Serialize};
use winsql_types::SqlValue;

use crate::AggregateFunction;

/// Pairs a category value with the column that carries it in wide form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotCategory {
    pub value: SqlValue,
    pub column: String,
}

impl PivotCategory {
    pub fn new(value: impl Into<SqlValue>, column: impl Into<String>) -> Self {
        PivotCategory { value: value.into(), column: column.into() }
    }
}

/// Turn distinct category values into output columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotSpec {
    pub group_by: Vec<String>,
    pub category_column: String,
    pub value_column: String,
    pub categories: Vec<PivotCategory>,
    /// Cell reducer. Without one, a group may hold at most one row per category.
    #[serde(default)]
    pub aggregate: Option<AggregateFunction>,
}

impl PivotSpec {
    pub fn new<I, S>(
        group_by: I,
        category_column: impl Into<String>,
        value_column: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PivotSpec {
            group_by: group_by.into_iter().map(Into::into).collect(),
            category_column: category_column.into(),
            value_column: value_column.into(),
            categories: Vec::new(),
            aggregate: None,
        }
    }

    pub fn category(mut self, value: impl Into<SqlValue>, column: impl Into<String>) -> Self {
        self.categories.push(PivotCategory::new(value, column));
        self
    }

    pub fn aggregate(mut self, function: AggregateFunction) -> Self {
        self.aggregate = Some(function);
        self
    }
}

/// Fold wide columns back into (category, value) rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnpivotSpec {
    pub key_columns: Vec<String>,
    /// Each wide column and the category value it stands for
    pub value_columns: Vec<PivotCategory>,
    pub category_column: String,
    pub value_column: String,
    /// Emit rows for NULL cells too
    #[serde(default)]
    pub include_nulls: bool,
}

impl UnpivotSpec {
    pub fn new<I, S>(
        key_columns: I,
        category_column: impl Into<String>,
        value_column: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        UnpivotSpec {
            key_columns: key_columns.into_iter().map(Into::into).collect(),
            value_columns: Vec::new(),
            category_column: category_column.into(),
            value_column: value_column.into(),
            include_nulls: false,
        }
    }

    pub fn column(mut self, column: impl Into<String>, category: impl Into<SqlValue>) -> Self {
        self.value_columns.push(PivotCategory::new(category, column));
        self
    }

    pub fn include_nulls(mut self) -> Self {
        self.include_nulls = true;
        self
    }
}
