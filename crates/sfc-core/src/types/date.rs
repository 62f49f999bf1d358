//! Date type for reporting runs.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// A calendar date (reporting date, position date, maturity).
///
/// Newtype around `chrono::NaiveDate`. Source files use both the ISO form
/// (`2020-04-29`) and the compact form (`20200429`); both parse.
///
/// # Example
///
/// ```rust
/// use sfc_core::types::Date;
///
/// let a = Date::parse("2020-04-29").unwrap();
/// let b = Date::parse_compact("20200429").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_compact_string(), "20200429");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a new date from year, month, and day.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the date is invalid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> CoreResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| CoreError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Parses an ISO 8601 date (`YYYY-MM-DD`).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the string is not a valid date.
    pub fn parse(s: &str) -> CoreResult<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|_| CoreError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Parses a compact date (`YYYYMMDD`).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the string is not a valid date.
    pub fn parse_compact(s: &str) -> CoreResult<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y%m%d")
            .map(Date)
            .map_err(|_| CoreError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Parses either the ISO or the compact form.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if neither form matches.
    pub fn parse_flexible(s: &str) -> CoreResult<Self> {
        if s.contains('-') {
            Self::parse(s)
        } else {
            Self::parse_compact(s)
        }
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Adds a number of days to the date.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Date(self.0 + chrono::Duration::days(days))
    }

    /// Calendar days from `self` to `other` (negative if `other` is earlier).
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Returns the `YYYYMMDD` form used in source file names and FX tables.
    #[must_use]
    pub fn to_compact_string(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }

    /// Returns the underlying `NaiveDate`.
    #[must_use]
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl From<Date> for NaiveDate {
    fn from(date: Date) -> Self {
        date.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_creation() {
        let date = Date::from_ymd(2020, 4, 29).unwrap();
        assert_eq!(date.year(), 2020);
        assert_eq!(date.month(), 4);
        assert_eq!(date.day(), 29);
    }

    #[test]
    fn test_invalid_date() {
        assert!(Date::from_ymd(2020, 2, 30).is_err());
        assert!(Date::parse("2020-13-01").is_err());
        assert!(Date::parse_compact("2020041").is_err());
    }

    #[test]
    fn test_parse_forms() {
        let iso = Date::parse("2020-05-29").unwrap();
        let compact = Date::parse_compact("20200529").unwrap();
        assert_eq!(iso, compact);
        assert_eq!(Date::parse_flexible("2020-05-29").unwrap(), iso);
        assert_eq!(Date::parse_flexible(" 20200529 ").unwrap(), iso);
    }

    #[test]
    fn test_days_between() {
        let start = Date::from_ymd(2020, 4, 29).unwrap();
        let end = Date::from_ymd(2021, 4, 29).unwrap();
        assert_eq!(start.days_between(&end), 365);
        assert_eq!(end.days_between(&start), -365);
        assert_eq!(start.add_days(365), end);
    }

    #[test]
    fn test_display() {
        let date = Date::from_ymd(2020, 1, 31).unwrap();
        assert_eq!(date.to_string(), "2020-01-31");
        assert_eq!(date.to_compact_string(), "20200131");
    }

    #[test]
    fn test_serde() {
        let date = Date::from_ymd(2020, 4, 29).unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2020-04-29\"");
        let parsed: Date = serde_json::from_str(&json).unwrap();
        assert_eq!(date, parsed);
    }
}
