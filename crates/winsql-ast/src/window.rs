//! Window specifications, frames and window function calls

use std::fmt;

use serde::{Deserialize, Serialize};
use winsql_types::{DataType, SqlValue};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

/// Placement of NULL sort keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NullsOrder {
    First,
    Last,
}

/// ORDER BY item
///
/// When `nulls` is unset, NULLs sort last ascending and first descending,
/// i.e. NULL behaves as the largest value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderByItem {
    pub column: String,
    #[serde(default)]
    pub direction: OrderDirection,
    #[serde(default)]
    pub nulls: Option<NullsOrder>,
}

impl OrderByItem {
    pub fn asc(column: impl Into<String>) -> Self {
        OrderByItem { column: column.into(), direction: OrderDirection::Asc, nulls: None }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        OrderByItem { column: column.into(), direction: OrderDirection::Desc, nulls: None }
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = Some(NullsOrder::First);
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = Some(NullsOrder::Last);
        self
    }

    pub fn effective_nulls(&self) -> NullsOrder {
        match (self.nulls, self.direction) {
            (Some(nulls), _) => nulls,
            (None, OrderDirection::Asc) => NullsOrder::Last,
            (None, OrderDirection::Desc) => NullsOrder::First,
        }
    }
}

/// Frame boundary for explicit ROWS frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameBound {
    UnboundedPreceding,
    Preceding(usize),
    CurrentRow,
    Following(usize),
    UnboundedFollowing,
}

impl fmt::Display for FrameBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameBound::UnboundedPreceding => write!(f, "UNBOUNDED PRECEDING"),
            FrameBound::Preceding(n) => write!(f, "{} PRECEDING", n),
            FrameBound::CurrentRow => write!(f, "CURRENT ROW"),
            FrameBound::Following(n) => write!(f, "{} FOLLOWING", n),
            FrameBound::UnboundedFollowing => write!(f, "UNBOUNDED FOLLOWING"),
        }
    }
}

/// Row-based frame relative to the current row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameSpec {
    /// Partition start through the current row
    Running,
    /// The current row and the k-1 rows before it
    Sliding(usize),
    /// Every row of the partition
    Whole,
    /// Explicit `ROWS BETWEEN start AND end`
    Rows { start: FrameBound, end: FrameBound },
}

impl FrameSpec {
    pub fn rows(start: FrameBound, end: FrameBound) -> Self {
        FrameSpec::Rows { start, end }
    }
}

/// How rows are grouped and ordered before window functions run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    #[serde(default)]
    pub partition_by: Vec<String>,
    #[serde(default)]
    pub order_by: Vec<OrderByItem>,
    /// Frame used by functions that don't carry their own
    #[serde(default)]
    pub frame: Option<FrameSpec>,
}

impl WindowSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partition_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.partition_by = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn order_by(mut self, items: Vec<OrderByItem>) -> Self {
        self.order_by = items;
        self
    }

    pub fn frame(mut self, frame: FrameSpec) -> Self {
        self.frame = Some(frame);
        self
    }
}

/// Aggregates usable as window functions and pivot cell reducers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateFunction {
    Sum,
    Avg,
    Min,
    Max,
    /// COUNT(column): non-NULL values only
    Count,
    /// COUNT(*): every row
    CountStar,
}

impl AggregateFunction {
    pub fn name(&self) -> &'static str {
        match self {
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
            AggregateFunction::Count => "COUNT",
            AggregateFunction::CountStar => "COUNT(*)",
        }
    }

    /// Whether the input type can be aggregated at all
    pub fn accepts(&self, input: DataType) -> bool {
        match self {
            AggregateFunction::Sum | AggregateFunction::Avg => {
                input.is_numeric() || input == DataType::Null
            }
            _ => true,
        }
    }

    /// Result type given the aggregated column's type
    pub fn result_type(&self, input: DataType) -> DataType {
        match self {
            AggregateFunction::Count | AggregateFunction::CountStar => DataType::Integer,
            AggregateFunction::Avg => DataType::Numeric,
            AggregateFunction::Sum if input == DataType::Null => DataType::Integer,
            AggregateFunction::Sum | AggregateFunction::Min | AggregateFunction::Max => input,
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn default_offset() -> i64 {
    1
}

/// A window function and its arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WindowFunction {
    RowNumber,
    Rank,
    DenseRank,
    PercentRank,
    CumeDist,
    Ntile(i64),
    Lag {
        column: String,
        #[serde(default = "default_offset")]
        offset: i64,
        #[serde(default)]
        default: Option<SqlValue>,
    },
    Lead {
        column: String,
        #[serde(default = "default_offset")]
        offset: i64,
        #[serde(default)]
        default: Option<SqlValue>,
    },
    FirstValue {
        column: String,
    },
    LastValue {
        column: String,
    },
    NthValue {
        column: String,
        n: i64,
    },
    /// Aggregate over the frame.
    ///
    /// With `strict`, a bounded frame holding fewer rows than its nominal
    /// width yields NULL instead of a partial aggregate.
    Aggregate {
        function: AggregateFunction,
        #[serde(default)]
        column: Option<String>,
        #[serde(default)]
        strict: bool,
    },
}

impl WindowFunction {
    pub fn lag(column: impl Into<String>, offset: i64) -> Self {
        WindowFunction::Lag { column: column.into(), offset, default: None }
    }

    pub fn lead(column: impl Into<String>, offset: i64) -> Self {
        WindowFunction::Lead { column: column.into(), offset, default: None }
    }

    pub fn first_value(column: impl Into<String>) -> Self {
        WindowFunction::FirstValue { column: column.into() }
    }

    pub fn last_value(column: impl Into<String>) -> Self {
        WindowFunction::LastValue { column: column.into() }
    }

    pub fn nth_value(column: impl Into<String>, n: i64) -> Self {
        WindowFunction::NthValue { column: column.into(), n }
    }

    pub fn aggregate(function: AggregateFunction, column: impl Into<String>) -> Self {
        WindowFunction::Aggregate { function, column: Some(column.into()), strict: false }
    }

    pub fn sum(column: impl Into<String>) -> Self {
        Self::aggregate(AggregateFunction::Sum, column)
    }

    pub fn avg(column: impl Into<String>) -> Self {
        Self::aggregate(AggregateFunction::Avg, column)
    }

    pub fn min(column: impl Into<String>) -> Self {
        Self::aggregate(AggregateFunction::Min, column)
    }

    pub fn max(column: impl Into<String>) -> Self {
        Self::aggregate(AggregateFunction::Max, column)
    }

    pub fn count(column: impl Into<String>) -> Self {
        Self::aggregate(AggregateFunction::Count, column)
    }

    pub fn count_star() -> Self {
        WindowFunction::Aggregate {
            function: AggregateFunction::CountStar,
            column: None,
            strict: false,
        }
    }

    /// Replace the LAG/LEAD default; no effect on other functions
    pub fn with_default(mut self, value: impl Into<SqlValue>) -> Self {
        if let WindowFunction::Lag { default, .. } | WindowFunction::Lead { default, .. } =
            &mut self
        {
            *default = Some(value.into());
        }
        self
    }

    /// Switch an aggregate to strict frame semantics; no effect on other functions
    pub fn strict(mut self) -> Self {
        if let WindowFunction::Aggregate { strict, .. } = &mut self {
            *strict = true;
        }
        self
    }

    pub fn name(&self) -> &'static str {
        match self {
            WindowFunction::RowNumber => "ROW_NUMBER",
            WindowFunction::Rank => "RANK",
            WindowFunction::DenseRank => "DENSE_RANK",
            WindowFunction::PercentRank => "PERCENT_RANK",
            WindowFunction::CumeDist => "CUME_DIST",
            WindowFunction::Ntile(_) => "NTILE",
            WindowFunction::Lag { .. } => "LAG",
            WindowFunction::Lead { .. } => "LEAD",
            WindowFunction::FirstValue { .. } => "FIRST_VALUE",
            WindowFunction::LastValue { .. } => "LAST_VALUE",
            WindowFunction::NthValue { .. } => "NTH_VALUE",
            WindowFunction::Aggregate { function, .. } => function.name(),
        }
    }

    /// Functions whose result is meaningless without an ordering.
    ///
    /// ROW_NUMBER is not one of them: unordered, it numbers rows in input order.
    pub fn requires_order(&self) -> bool {
        matches!(
            self,
            WindowFunction::Rank
                | WindowFunction::DenseRank
                | WindowFunction::PercentRank
                | WindowFunction::CumeDist
                | WindowFunction::Ntile(_)
                | WindowFunction::Lag { .. }
                | WindowFunction::Lead { .. }
        )
    }
}

/// A window function bound to an output column name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowFunctionCall {
    pub output: String,
    pub function: WindowFunction,
    /// Overrides the window's frame for this call
    #[serde(default)]
    pub frame: Option<FrameSpec>,
}

impl WindowFunctionCall {
    pub fn new(output: impl Into<String>, function: WindowFunction) -> Self {
        WindowFunctionCall { output: output.into(), function, frame: None }
    }

    pub fn with_frame(mut self, frame: FrameSpec) -> Self {
        self.frame = Some(frame);
        self
    }
}
