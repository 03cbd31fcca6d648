//! In-memory relation model
//!
//! A [`Relation`] is a multiset of positional [`Row`]s that all conform to one
//! [`RelationSchema`]. Relations are validated once on construction so the
//! executor can index rows by column position without further checks.

mod error;
mod relation;
mod row;
mod schema;

pub use error::{RowValidationError, SchemaDefinitionError};
pub use relation::Relation;
pub use row::Row;
pub use schema::{ColumnSchema, RelationSchema};
