//! Date helper functions

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Sentinel used for articles whose date could not be parsed (1970-01-01T00:00:00)
pub fn epoch_sentinel() -> NaiveDateTime {
    NaiveDateTime::default()
}

/// Parse a date string in various formats into a canonical UTC timestamp
///
/// Offset-carrying inputs are converted to UTC; naive inputs are taken as-is.
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // RFC 3339 / ISO 8601 with offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    let offset_formats = ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%d %H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"];
    for fmt in offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_utc());
        }
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];
    for fmt in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Interpret a native integer date as Unix seconds
pub fn parse_timestamp(secs: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
}

/// Format a date using Moment.js-compatible format string
///
/// Returns `None` when the format leaves an invalid `%` specifier behind.
///
/// # Examples
/// ```ignore
/// format_date(&date, "YYYY-MM-DD") // -> Some("2024-01-15")
/// ```
pub fn format_date(date: &NaiveDateTime, format: &str) -> Option<String> {
    let chrono_format = moment_to_chrono_format(format);
    let items: Vec<Item> = StrftimeItems::new(&chrono_format).collect();
    if items.contains(&Item::Error) {
        return None;
    }
    Some(date.format_with_items(items.into_iter()).to_string())
}

/// Whether `format` can be used with [`format_date`]
pub fn is_valid_date_format(format: &str) -> bool {
    let chrono_format = moment_to_chrono_format(format);
    !StrftimeItems::new(&chrono_format).any(|item| item == Item::Error)
}

/// Canonical ISO-8601 calendar date
pub fn iso_date(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format date in full format (like "January 1, 2024")
pub fn full_date(date: &NaiveDateTime) -> String {
    date.format("%B %d, %Y").to_string()
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest tokens first within each family
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DDDD", "%j"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("dddd", "%A"),
        ("ddd", "%a"),
        ("ZZ", "%z"),
        ("SSS", "%3f"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}
