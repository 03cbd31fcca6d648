//! Request model for windowed analytical computations
//!
//! This crate defines the declarative structures a caller hands to the
//! evaluator: expressions, window specifications, frames, island detection,
//! pivoting and the overall computation request. Nothing here touches rows;
//! binding and evaluation live in `winsql-executor`.

mod expression;
mod islands;
mod operators;
mod pivot;
mod request;
mod window;

pub use expression::{CaseWhen, Expression};
pub use islands::{Contiguity, IslandOutput, IslandSpec};
pub use operators::{BinaryOperator, UnaryOperator};
pub use pivot::{PivotCategory, PivotSpec, UnpivotSpec};
pub use request::{ComputationRequest, ProjectionItem};
pub use window::{
    AggregateFunction, FrameBound, FrameSpec, NullsOrder, OrderByItem, OrderDirection,
    WindowFunction, WindowFunctionCall, WindowSpec,
};
