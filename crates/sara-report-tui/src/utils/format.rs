use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Format a date for headings, e.g. "January 01, 2024"
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// Parse a `YYYY-MM-DD` date typed by the user
pub fn parse_date_input(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .with_context(|| format!("'{}' is not a date (expected YYYY-MM-DD)", trimmed))
}

/// Truncate a string to a maximum length in chars, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_long_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(format_long_date(date), "January 01, 2024");
    }

    #[test]
    fn test_parse_date_input() {
        assert_eq!(
            parse_date_input(" 2024-02-29 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date_input("2023-02-29").is_err()); // not a leap year
        assert!(parse_date_input("01/02/2024").is_err());
        assert!(parse_date_input("").is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi", 2), "Hi");
        assert_eq!(truncate("ยอดขายรวม", 5), "ยอ...");
    }
}
