//! WinSQL - partitioned, ordered window computation over in-memory relations
//!
//! This is the root crate that re-exports all components.

pub use winsql_ast as ast;
pub use winsql_executor as executor;
pub use winsql_storage as storage;
pub use winsql_types as types;

pub use winsql_executor::{evaluate, evaluate_with_options, CoreError, SchemaError, SpecError};
