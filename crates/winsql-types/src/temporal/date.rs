//! SQL DATE type implementation

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// SQL DATE type - represents a calendar date without time
///
/// Format: YYYY-MM-DD (e.g., '2024-01-01').
/// Always holds a valid proleptic Gregorian date, so day arithmetic cannot fail
/// except at the far ends of the supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Date(NaiveDate);

impl Date {
    /// Create a new Date, rejecting impossible calendar dates such as Feb 30
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, String> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| format!("Invalid date: {:04}-{:02}-{:02}", year, month, day))
    }

    pub(crate) fn naive(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Days since 0001-01-01 (day 1). Consecutive calendar days differ by exactly 1.
    pub fn to_day_number(&self) -> i64 {
        i64::from(self.0.num_days_from_ce())
    }

    /// Inverse of [`Date::to_day_number`]
    pub fn from_day_number(days: i64) -> Option<Self> {
        let days = i32::try_from(days).ok()?;
        NaiveDate::from_num_days_from_ce_opt(days).map(Date)
    }

    /// Shift by a signed number of days
    pub fn add_days(&self, days: i64) -> Option<Self> {
        Self::from_day_number(self.to_day_number().checked_add(days)?)
    }

    /// Signed number of days from `other` to `self`
    pub fn days_since(&self, other: &Date) -> i64 {
        self.to_day_number() - other.to_day_number()
    }
}

impl FromStr for Date {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Parse format: YYYY-MM-DD
        let parts: Vec<&str> = s.trim().split('-').collect();
        if parts.len() != 3 {
            return Err(format!("Invalid date format: '{}' (expected YYYY-MM-DD)", s));
        }

        let year = parts[0].parse::<i32>().map_err(|_| format!("Invalid year: '{}'", parts[0]))?;
        let month = parts[1].parse::<u32>().map_err(|_| format!("Invalid month: '{}'", parts[1]))?;
        let day = parts[2].parse::<u32>().map_err(|_| format!("Invalid day: '{}'", parts[2]))?;

        Date::new(year, month, day)
    }
}

impl TryFrom<String> for Date {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Date> for String {
    fn from(date: Date) -> Self {
        date.to_string()
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let date: Date = "2024-03-07".parse().unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 3);
        assert_eq!(date.day(), 7);
        assert_eq!(date.to_string(), "2024-03-07");
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert!(Date::new(2023, 2, 29).is_err());
        assert!("2024-13-01".parse::<Date>().is_err());
        assert!("2024/01/01".parse::<Date>().is_err());
    }

    #[test]
    fn test_day_numbers_cross_month_and_leap_day() {
        let feb28: Date = "2024-02-28".parse().unwrap();
        let mar01: Date = "2024-03-01".parse().unwrap();
        assert_eq!(mar01.days_since(&feb28), 2);
        assert_eq!(feb28.add_days(1).unwrap().to_string(), "2024-02-29");
        assert_eq!(Date::from_day_number(feb28.to_day_number()), Some(feb28));
    }

    #[test]
    fn test_ordering() {
        let a: Date = "2023-12-31".parse().unwrap();
        let b: Date = "2024-01-01".parse().unwrap();
        assert!(a < b);
    }
}
