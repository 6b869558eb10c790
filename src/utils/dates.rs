// src/utils/dates.rs
//! Date formatting utilities for the verification mappers.
//!
//! External providers disagree about date shapes: the customer-record
//! system emits ISO dates with an optional time suffix, while the NDI
//! wallet credential may carry `DD/MM/YYYY`. Both formatters are total:
//! anything unparsable collapses to an empty string so a bad date is an
//! unfilled form field, never an error.

use chrono::NaiveDate;

/// Reduces an ISO date string to its date-only portion.
///
/// Accepts `YYYY-MM-DD` with an optional time suffix (separated by `T`
/// or a space), which is discarded.
///
/// # Arguments
/// * `raw` - The candidate date string (may be empty or padded)
///
/// # Returns
/// The `YYYY-MM-DD` portion, or an empty string if the input does not
/// parse as a date.
pub fn format_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let date_part = trimmed
        .split(|c| c == 'T' || c == ' ')
        .next()
        .unwrap_or_default();

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Like [`format_date`], but additionally accepts `DD/MM/YYYY` and
/// converts it to `YYYY-MM-DD`.
///
/// The NDI credential provider emits slash dates; the canonical form
/// schema only ever stores ISO dates.
pub fn format_date_flexible(raw: &str) -> String {
    let iso = format_date(raw);
    if !iso.is_empty() {
        return iso;
    }

    NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date_passthrough() {
        assert_eq!(format_date("2024-03-15"), "2024-03-15");
    }

    #[test]
    fn test_time_suffix_discarded() {
        assert_eq!(format_date("2024-03-15T00:00:00Z"), "2024-03-15");
        assert_eq!(format_date("2024-03-15 10:30:00"), "2024-03-15");
    }

    #[test]
    fn test_unparsable_yields_empty() {
        assert_eq!(format_date("not-a-date"), "");
        assert_eq!(format_date(""), "");
        assert_eq!(format_date("   "), "");
        assert_eq!(format_date("15/03/2024"), "");
    }

    #[test]
    fn test_flexible_accepts_slash_dates() {
        assert_eq!(format_date_flexible("15/03/2024"), "2024-03-15");
        assert_eq!(format_date_flexible("2024-03-15T00:00:00Z"), "2024-03-15");
        assert_eq!(format_date_flexible("31/02/2024"), "");
        assert_eq!(format_date_flexible("garbage"), "");
    }
}
