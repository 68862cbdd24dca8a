// src/utils.rs
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};

/// Normalize an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trimmed copy of an optional value, `None` when blank
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse a deadline given either as RFC 3339 or as a plain `YYYY-MM-DD`
/// date, which is read as the end of that day in UTC.
pub fn parse_deadline(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid deadline '{}': expected YYYY-MM-DD or RFC 3339", value))?;
    let end_of_day = date
        .and_hms_opt(23, 59, 59)
        .with_context(|| format!("Invalid deadline '{}'", value))?;
    Ok(end_of_day.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  Hanoi ")), Some("Hanoi".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_parse_deadline_plain_date() {
        let deadline = parse_deadline("2026-12-31").unwrap();
        assert_eq!(deadline.year(), 2026);
        assert_eq!(deadline.month(), 12);
        assert_eq!(deadline.day(), 31);
        assert_eq!(deadline.hour(), 23);
    }

    #[test]
    fn test_parse_deadline_rfc3339_is_converted_to_utc() {
        let deadline = parse_deadline("2026-06-01T09:00:00+07:00").unwrap();
        assert_eq!(deadline.hour(), 2);
    }

    #[test]
    fn test_parse_deadline_rejects_garbage() {
        assert!(parse_deadline("next friday").is_err());
    }
}
