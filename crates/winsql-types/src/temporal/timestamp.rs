//! SQL TIMESTAMP type implementation

use std::{fmt, str::FromStr};

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::Date;

/// SQL TIMESTAMP type - represents a date and time of day (no time zone)
///
/// Supported input formats:
/// - Space-separated: '2024-01-01 14:30:00' (optionally with fractional seconds)
/// - ISO 8601: '2024-01-01T14:30:00'
/// - Date only: '2024-01-01' (assumes midnight)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Create a new Timestamp from a date and a wall-clock time
    pub fn new(date: Date, hour: u32, minute: u32, second: u32) -> Result<Self, String> {
        let time = NaiveTime::from_hms_opt(hour, minute, second)
            .ok_or_else(|| format!("Invalid time: {:02}:{:02}:{:02}", hour, minute, second))?;
        Ok(Timestamp(NaiveDateTime::new(date.naive(), time)))
    }

    /// Calendar date part
    pub fn date(&self) -> Date {
        Date::from(self.0.date())
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }
}

const FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

impl FromStr for Timestamp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        for format in FORMATS {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(Timestamp(parsed));
            }
        }

        // Date only - use midnight time
        if let Ok(date) = Date::from_str(trimmed) {
            return Timestamp::new(date, 0, 0, 0);
        }

        Err(format!(
            "Invalid timestamp format: '{}'. Supported formats: \
            space-separated (2025-11-10 08:24:34), \
            ISO 8601 (2025-11-10T08:24:34), \
            or date only (2025-11-10)",
            s
        ))
    }
}

impl TryFrom<String> for Timestamp {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> Self {
        ts.to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}
