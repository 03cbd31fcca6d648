//! Pipeline evaluator
//!
//! One request runs as a fixed sequence of stages:
//!
//! ```text
//! Scanned -> Partitioned -> Ordered -> WindowApplied -> PostFiltered
//!         -> Pivoted -> Projected -> Sorted -> Done
//! ```
//!
//! Stages the request doesn't ask for are skipped. The whole request is
//! bound against the input schema before any row is read, so a request
//! either produces a complete relation or fails without output.

mod execute;
mod plan;
mod state;

#[cfg(test)]
mod tests;

pub use plan::ExecutionPlan;
pub use state::PipelineState;

use winsql_ast::ComputationRequest;
use winsql_storage::Relation;

use crate::{errors::CoreError, parallel::EvaluatorOptions};

/// Evaluate `request` over `relation` with default options
pub fn evaluate(relation: &Relation, request: &ComputationRequest) -> Result<Relation, CoreError> {
    evaluate_with_options(relation, request, &EvaluatorOptions::default())
}

/// Evaluate `request` over `relation`
///
/// Results are identical for every [`EvaluatorOptions`] setting; options
/// only decide whether partitions and row-level stages fan out.
pub fn evaluate_with_options(
    relation: &Relation,
    request: &ComputationRequest,
    options: &EvaluatorOptions,
) -> Result<Relation, CoreError> {
    let plan = ExecutionPlan::new(request, relation.schema())?;
    log::debug!(
        "evaluating {} rows through {} stages ({:?})",
        relation.len(),
        plan.stages().len(),
        options.parallelism
    );
    plan.execute(relation, options)
}
