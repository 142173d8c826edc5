//! Post date parsing and formatting

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

/// Parse a `posted` value in one of the common front-matter formats.
///
/// Values without an offset are taken as UTC.
pub fn parse_posted(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    const DATETIME_FORMATS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y"];
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}

/// `{month}/{day}/{year}` with a 1-based, unpadded month and day
pub fn month_day_year(date: &DateTime<Utc>) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_only() {
        let dt = parse_posted("2016-01-05").unwrap();
        assert_eq!(dt.timestamp_millis(), 1_451_952_000_000);
        assert_eq!(month_day_year(&dt), "1/5/2016");
    }

    #[test]
    fn test_parse_datetime_formats() {
        assert!(parse_posted("2024-01-15 10:30:00").is_some());
        assert!(parse_posted("2024/01/15 10:30").is_some());
        assert!(parse_posted("2024-01-15T10:30:00").is_some());
        assert!(parse_posted("January 15, 2024").is_some());
    }

    #[test]
    fn test_parse_rfc3339_normalises_to_utc() {
        let dt = parse_posted("2024-01-15T01:00:00+02:00").unwrap();
        assert_eq!(month_day_year(&dt), "1/14/2024");
    }

    #[test]
    fn test_unparsable() {
        assert!(parse_posted("someday").is_none());
        assert!(parse_posted("").is_none());
    }
}
