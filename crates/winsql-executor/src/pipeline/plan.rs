//! Request validation
//!
//! Every column reference and type in a request is checked here, stage by
//! stage against the schema the previous stage produces. Nothing in
//! [`ExecutionPlan`] can fail on well-formed rows except an ambiguous pivot
//! cell.

use winsql_ast::ComputationRequest;
use winsql_storage::{ColumnSchema, RelationSchema};
use winsql_types::DataType;

use super::state::PipelineState;
use crate::{
    errors::{column_not_found, CoreError, SchemaError, SpecError},
    evaluator::{
        bind_expression,
        window::{bind_window_call, resolve_sort_keys, validate_frame, BoundWindowCall, SortKey},
        BoundExpression,
    },
    islands::BoundIslands,
    pivot::BoundPivot,
};

/// Partitioning, ordering and per-partition work
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WindowStage {
    pub(crate) partition_columns: Vec<usize>,
    pub(crate) sort_keys: Vec<SortKey>,
    pub(crate) calls: Vec<BoundWindowCall>,
    pub(crate) islands: Option<BoundIslands>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ProjectionStage {
    pub(crate) exprs: Vec<BoundExpression>,
    pub(crate) distinct: bool,
}

/// A request bound to an input schema
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionPlan {
    pub(crate) input_schema: RelationSchema,
    pub(crate) window: Option<WindowStage>,
    pub(crate) filter: Option<BoundExpression>,
    pub(crate) pivot: Option<BoundPivot>,
    pub(crate) projection: Option<ProjectionStage>,
    pub(crate) order_by: Vec<SortKey>,
    pub(crate) limit: Option<usize>,
    pub(crate) output_schema: RelationSchema,
    pub(crate) stages: Vec<PipelineState>,
}

impl ExecutionPlan {
    /// Bind `request` to `schema`, failing on the first schema or spec error
    pub fn new(request: &ComputationRequest, schema: &RelationSchema) -> Result<Self, CoreError> {
        let mut stages = vec![PipelineState::Scanned];
        let mut current = schema.clone();

        if let Some(frame) = &request.window.frame {
            validate_frame(frame)?;
        }
        let partition_columns = request
            .window
            .partition_by
            .iter()
            .map(|name| {
                current
                    .index_of(name)
                    .ok_or_else(|| column_not_found(name, &current.column_names()))
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;
        let sort_keys = resolve_sort_keys(&request.window.order_by, &current)?;

        let window = if request.has_window_work() {
            let mut calls = Vec::with_capacity(request.functions.len());
            let mut augmented = current.clone();
            for call in &request.functions {
                let bound = bind_window_call(call, &request.window, &current)?;
                augmented.push(bound.output.clone())?;
                calls.push(bound);
            }
            current = augmented;

            let islands = match &request.islands {
                Some(spec) => {
                    let (bound, island_schema) =
                        BoundIslands::bind(spec, &request.window, &current)?;
                    current = island_schema;
                    Some(bound)
                }
                None => None,
            };

            stages.push(PipelineState::Partitioned);
            if !sort_keys.is_empty() {
                stages.push(PipelineState::Ordered);
            }
            stages.push(PipelineState::WindowApplied);
            Some(WindowStage { partition_columns, sort_keys, calls, islands })
        } else {
            None
        };

        let filter = match &request.filter {
            Some(expr) => {
                let bound = bind_expression(expr, &current)?;
                if !matches!(bound.data_type(), DataType::Boolean | DataType::Null) {
                    return Err(SchemaError::TypeMismatch {
                        column: expr.to_string(),
                        expected: "BOOLEAN".to_string(),
                        found: bound.data_type(),
                    }
                    .into());
                }
                stages.push(PipelineState::PostFiltered);
                Some(bound)
            }
            None => None,
        };

        let pivot = match &request.pivot {
            Some(spec) => {
                let (bound, pivot_schema) = BoundPivot::bind(spec, &current)?;
                current = pivot_schema;
                stages.push(PipelineState::Pivoted);
                Some(bound)
            }
            None => None,
        };

        let projection = match (&request.projection, request.distinct) {
            (Some(items), _) if items.is_empty() => return Err(SpecError::EmptyProjection.into()),
            (Some(items), distinct) => {
                let mut exprs = Vec::with_capacity(items.len());
                let mut projected = RelationSchema::default();
                for item in items {
                    let bound = bind_expression(&item.expr, &current)?;
                    let nullable =
                        bound.as_column().map_or(true, |idx| current.columns()[idx].nullable);
                    projected.push(ColumnSchema::new(
                        item.output_name(),
                        bound.data_type(),
                        nullable,
                    ))?;
                    exprs.push(bound);
                }
                current = projected;
                stages.push(PipelineState::Projected);
                Some(ProjectionStage { exprs, distinct })
            }
            (None, true) => {
                stages.push(PipelineState::Projected);
                Some(ProjectionStage { exprs: Vec::new(), distinct: true })
            }
            (None, false) => None,
        };

        let order_by = resolve_sort_keys(&request.order_by, &current)?;
        if !order_by.is_empty() || request.limit.is_some() {
            stages.push(PipelineState::Sorted);
        }
        stages.push(PipelineState::Done);

        Ok(ExecutionPlan {
            input_schema: schema.clone(),
            window,
            filter,
            pivot,
            projection,
            order_by,
            limit: request.limit,
            output_schema: current,
            stages,
        })
    }

    /// Schema of the relation the plan produces (before overflow widening)
    pub fn output_schema(&self) -> &RelationSchema {
        &self.output_schema
    }

    pub fn input_schema(&self) -> &RelationSchema {
        &self.input_schema
    }

    /// Stages the plan runs, in order
    pub fn stages(&self) -> &[PipelineState] {
        &self.stages
    }
}
