use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NumericRange {
    pub start: f64,
    pub end: f64,
}

/// Parses an inclusive `MIN-MAX` range such as `2-6` or `10.5-40`.
pub fn parse_numeric_range(value: &str) -> Result<NumericRange, String> {
    let trimmed = value.trim();
    let parts: Vec<&str> = trimmed.split('-').collect();
    if parts.len() != 2 {
        return Err("expected format MIN-MAX".to_string());
    }
    let start: f64 = parts[0]
        .trim()
        .parse()
        .map_err(|_| "invalid MIN value".to_string())?;
    let end: f64 = parts[1]
        .trim()
        .parse()
        .map_err(|_| "invalid MAX value".to_string())?;
    if !start.is_finite() || !end.is_finite() {
        return Err("range values must be finite".to_string());
    }
    if start < 0.0 || end < 0.0 {
        return Err("range values must be non-negative".to_string());
    }
    if start > end {
        return Err("MIN must not be greater than MAX".to_string());
    }
    Ok(NumericRange { start, end })
}

/// Splits a comma separated list, trimming items and dropping empties and repeats.
pub fn parse_csv_list(value: &str) -> Result<Vec<String>, String> {
    let raw = value.trim();
    if raw.is_empty() {
        return Err("list is empty".to_string());
    }
    let mut out: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for part in raw.split(',') {
        let item = part.trim();
        if item.is_empty() {
            continue;
        }
        if seen.insert(item.to_string()) {
            out.push(item.to_string());
        }
    }
    if out.is_empty() {
        return Err("list is empty".to_string());
    }
    Ok(out)
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d %b %Y", "%b %d, %Y", "%B %d, %Y"];

/// Parses the date formats offers are published with. Values without an offset are
/// taken as UTC.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(naive.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}

pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    if secs < 60 {
        return "Just now".to_string();
    }
    if secs < 3600 {
        return format!("{}m ago", secs / 60);
    }
    if secs < 86_400 {
        return format!("{}h ago", secs / 3600);
    }
    format!("{}d ago", secs / 86_400)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn numeric_range_accepts_fractions() {
        let r = parse_numeric_range("10.5-40").unwrap();
        assert_eq!(r.start, 10.5);
        assert_eq!(r.end, 40.0);
    }

    #[test]
    fn numeric_range_rejects_invalid() {
        assert!(parse_numeric_range("5").is_err());
        assert!(parse_numeric_range("5-").is_err());
        assert!(parse_numeric_range("9-3").is_err());
    }

    #[test]
    fn csv_list_trims_and_dedupes() {
        let out = parse_csv_list(" a, b,,a ,c").unwrap();
        assert_eq!(out, vec!["a", "b", "c"]);
        assert!(parse_csv_list(" , ").is_err());
    }

    #[test]
    fn round1_keeps_one_decimal() {
        assert_eq!(round1(25.0), 25.0);
        assert_eq!(round1(12.345), 12.3);
        assert_eq!(round1(12.36), 12.4);
    }

    #[test]
    fn parse_date_handles_common_shapes() {
        let day = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_date("2024-01-01"), Some(day));
        assert_eq!(parse_date("2024-01-01T00:00:00Z"), Some(day));
        assert_eq!(parse_date("2024-01-01 00:00:00"), Some(day));
        assert!(parse_date("yesterday").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn time_ago_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(time_ago(now - Duration::seconds(30), now), "Just now");
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(time_ago(now - Duration::hours(3), now), "3h ago");
        assert_eq!(time_ago(now - Duration::days(4), now), "4d ago");
    }
}
