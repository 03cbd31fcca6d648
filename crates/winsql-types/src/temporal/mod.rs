//! Calendar types
//!
//! - DATE (day granularity, with day-number arithmetic)
//! - TIMESTAMP (second granularity)

mod date;
mod timestamp;

pub use date::Date;
pub use timestamp::Timestamp;
