//! Value and type system for winsql
//!
//! This crate provides:
//! - Data type definitions for relation columns
//! - `SqlValue`, the nullable runtime value
//! - Three-valued comparison, grouping equality and NULL-propagating arithmetic
//! - Calendar types (`Date`, `Timestamp`) with day arithmetic

mod data_type;
mod sql_value;
mod temporal;

pub use data_type::DataType;
pub use sql_value::{ArithmeticOp, SqlValue, TypeMismatch};
pub use temporal::{Date, Timestamp};
