use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Reads the date formats the backend hands out: RFC 3339 timestamps,
/// `YYYY-MM-DD HH:MM:SS`, and bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_portal_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Formats a stored date for a `YYYY-MM-DD` input, or an empty string.
pub fn to_input_date(raw: Option<&str>) -> String {
    raw.and_then(parse_portal_date)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
