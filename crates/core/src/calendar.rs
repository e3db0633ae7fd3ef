//! Document dates.
//!
//! Dates are stored as the text the user typed (headers are plain strings);
//! these helpers seed defaults and interpret that text where arithmetic needs it.

use chrono::NaiveDate;

/// Format used by every date field (`2025-11-23`).
pub const ISO_DATE: &str = "%Y-%m-%d";

pub fn format_iso(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

/// Parse a stored date; `None` for empty or malformed text.
pub fn parse_iso(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, ISO_DATE).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_and_parses_iso_dates() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 23).unwrap();
        assert_eq!(format_iso(date), "2025-11-23");
        assert_eq!(parse_iso(" 2025-11-23 "), Some(date));
    }

    #[test]
    fn malformed_dates_do_not_parse() {
        assert_eq!(parse_iso(""), None);
        assert_eq!(parse_iso("23/11/2025"), None);
        assert_eq!(parse_iso("2025-02-30"), None);
    }
}
