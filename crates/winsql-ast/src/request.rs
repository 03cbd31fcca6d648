//! The full computation request handed to the evaluator

use serde::{Deserialize, Serialize};

use crate::{Expression, IslandSpec, OrderByItem, PivotSpec, WindowFunctionCall, WindowSpec};

/// Output column of the projection stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionItem {
    pub expr: Expression,
    #[serde(default)]
    pub alias: Option<String>,
}

impl ProjectionItem {
    pub fn new(expr: Expression) -> Self {
        ProjectionItem { expr, alias: None }
    }

    pub fn column(name: impl Into<String>) -> Self {
        Self::new(Expression::ColumnRef(name.into()))
    }

    pub fn aliased(expr: Expression, alias: impl Into<String>) -> Self {
        ProjectionItem { expr, alias: Some(alias.into()) }
    }

    /// Alias if given, bare column name for column references, rendered expression otherwise
    pub fn output_name(&self) -> String {
        match (&self.alias, &self.expr) {
            (Some(alias), _) => alias.clone(),
            (None, Expression::ColumnRef(name)) => name.clone(),
            (None, expr) => expr.to_string(),
        }
    }
}

/// Everything one evaluation run does, stage by stage.
///
/// Stages run in a fixed order: window functions and island detection,
/// then `filter`, `pivot`, `projection` (with `distinct`), and finally
/// `order_by` and `limit`. Every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputationRequest {
    #[serde(default)]
    pub window: WindowSpec,
    #[serde(default)]
    pub functions: Vec<WindowFunctionCall>,
    #[serde(default)]
    pub islands: Option<IslandSpec>,
    /// Predicate over window outputs; rows where it is not TRUE are dropped
    #[serde(default)]
    pub filter: Option<Expression>,
    #[serde(default)]
    pub pivot: Option<PivotSpec>,
    #[serde(default)]
    pub projection: Option<Vec<ProjectionItem>>,
    #[serde(default)]
    pub distinct: bool,
    #[serde(default)]
    pub order_by: Vec<OrderByItem>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ComputationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(mut self, window: WindowSpec) -> Self {
        self.window = window;
        self
    }

    pub fn function(mut self, call: WindowFunctionCall) -> Self {
        self.functions.push(call);
        self
    }

    pub fn islands(mut self, islands: IslandSpec) -> Self {
        self.islands = Some(islands);
        self
    }

    pub fn filter(mut self, predicate: Expression) -> Self {
        self.filter = Some(predicate);
        self
    }

    pub fn pivot(mut self, pivot: PivotSpec) -> Self {
        self.pivot = Some(pivot);
        self
    }

    pub fn project(mut self, items: Vec<ProjectionItem>) -> Self {
        self.projection = Some(items);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn sort_by(mut self, items: Vec<OrderByItem>) -> Self {
        self.order_by = items;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether any per-partition work is requested
    pub fn has_window_work(&self) -> bool {
        !self.functions.is_empty() || self.islands.is_some()
    }
}
