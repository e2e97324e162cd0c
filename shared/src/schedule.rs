//! Calendar helpers for production schedules
//!
//! Schedules are display values only. They are derived by stepping back a
//! fixed number of days from the bottling date and pinning a time of day.

use std::fmt;

use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Date format used on every page (sv-SE, `2024-05-14`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time-of-day format used on every page (sv-SE, `06:30`)
pub const TIME_FORMAT: &str = "%H:%M";

/// A local wall-clock moment in a production schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub NaiveDateTime);

impl Timestamp {
    /// `days_before` days before `date`, at `hour:minute`
    pub fn before(date: NaiveDate, days_before: u64, hour: u32, minute: u32) -> Option<Self> {
        date.checked_sub_days(Days::new(days_before))?
            .and_hms_opt(hour, minute, 0)
            .map(Timestamp)
    }

    /// On `date` itself, at `hour:minute`
    pub fn on(date: NaiveDate, hour: u32, minute: u32) -> Option<Self> {
        Self::before(date, 0, hour, minute)
    }

    pub fn date_string(&self) -> String {
        self.0.format(DATE_FORMAT).to_string()
    }

    pub fn time_string(&self) -> String {
        self.0.format(TIME_FORMAT).to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date_string(), self.time_string())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Render an optional timestamp, falling back to the placeholder dash
pub fn display_timestamp(timestamp: Option<Timestamp>) -> String {
    timestamp
        .map(|t| t.to_string())
        .unwrap_or_else(|| crate::field::PLACEHOLDER.to_string())
}

/// Parse an ISO date as produced by a date input (`yyyy-mm-dd`)
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Deserialize a date field that may be empty or half-typed
///
/// Anything that is not a complete ISO date is treated as "not chosen".
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_before_crosses_month_boundary() {
        let ts = Timestamp::before(date(2024, 3, 1), 2, 16, 0).unwrap();
        assert_eq!(ts.to_string(), "2024-02-28 16:00");
    }

    #[test]
    fn test_before_leap_day() {
        let ts = Timestamp::before(date(2024, 3, 1), 1, 8, 30).unwrap();
        assert_eq!(ts.date_string(), "2024-02-29");
        assert_eq!(ts.time_string(), "08:30");
    }

    #[test]
    fn test_on_same_day() {
        let ts = Timestamp::on(date(2024, 5, 14), 6, 30).unwrap();
        assert_eq!(ts.to_string(), "2024-05-14 06:30");
    }

    #[test]
    fn test_invalid_time_is_none() {
        assert!(Timestamp::on(date(2024, 5, 14), 25, 0).is_none());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-05-14"), Some(date(2024, 5, 14)));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2024-05"), None);
    }

    #[test]
    fn test_timestamp_serializes_as_text() {
        let ts = Timestamp::on(date(2024, 5, 14), 7, 30).unwrap();
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"2024-05-14 07:30\"");
    }

    #[test]
    fn test_display_missing_timestamp() {
        assert_eq!(display_timestamp(None), crate::field::PLACEHOLDER);
    }
}
