//! Row-level and partition-level evaluation

pub mod expressions;
pub mod window;

pub use expressions::{bind_expression, BoundExpression};
