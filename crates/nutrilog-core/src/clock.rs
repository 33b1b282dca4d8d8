//! Wall-clock helpers shared by the log, fasting and profile modules.

use chrono::{DateTime, Local, NaiveDate, TimeZone};

/// Milliseconds in one hour.
pub const HOUR_MS: i64 = 60 * 60 * 1000;

/// Current time as epoch milliseconds.
pub fn now_ms() -> i64 {
    Local::now().timestamp_millis()
}

/// Calendar key (`YYYY-MM-DD`) for a local date.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Calendar key for today in local time.
pub fn today_key() -> String {
    date_key(Local::now().date_naive())
}

/// Parse a `YYYY-MM-DD` calendar key.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

/// Convert epoch milliseconds into a datetime in the given zone.
pub fn from_ms<Tz: TimeZone>(ms: i64, tz: &Tz) -> Option<DateTime<Tz>> {
    tz.timestamp_millis_opt(ms).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_key_roundtrips() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(date_key(date), "2024-03-09");
        assert_eq!(parse_date_key("2024-03-09"), Some(date));
        assert_eq!(parse_date_key("03/09/2024"), None);
    }
}
