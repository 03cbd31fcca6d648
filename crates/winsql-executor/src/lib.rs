//! Window computation over in-memory relations
//!
//! The entry point is [`evaluate`]: it takes a [`Relation`](winsql_storage::Relation)
//! and a [`ComputationRequest`](winsql_ast::ComputationRequest) and returns a
//! new relation. Partitioning, ordering, window functions, island detection,
//! post-filtering, pivoting, projection and the final sort all run as stages
//! of one pipeline.
//!
//! The building blocks are public too, for callers that only need one of
//! them: [`evaluator::window`] for partition-level window functions,
//! [`detect_islands`] for run detection and [`pivot()`] / [`unpivot`] for
//! reshaping.

pub mod errors;
pub mod evaluator;
pub mod islands;
pub mod parallel;
pub mod pipeline;
pub mod pivot;

pub use errors::{CoreError, CoreResult, SchemaError, SpecError};
pub use islands::{detect_islands, Island, IslandDetection};
pub use parallel::{EvaluatorOptions, ParallelConfig, ParallelThresholds, Parallelism};
pub use pipeline::{evaluate, evaluate_with_options, ExecutionPlan, PipelineState};
pub use pivot::{pivot, unpivot};
