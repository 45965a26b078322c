//! Date rendering for article records.
//!
//! Front matter dates are free text. The calendar fields (year, month, day)
//! are read as written, ignoring any time of day or UTC offset, and rendered
//! twice: `YYYY-MM-DD` for sorting and `DD Mon YYYY` for display.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use tracing::warn;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Both textual forms of a date; empty strings when there is no date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedDate {
    pub iso: String,
    pub readable: String,
}

/// Parse the calendar date out of a front matter value.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
}

/// Render `value` as `YYYY-MM-DD` and `DD Mon YYYY`.
///
/// Empty or absent input yields empty strings. Unparsable input is logged and
/// treated the same way.
pub fn format_date(value: Option<&str>) -> FormattedDate {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return FormattedDate::default();
    };
    match parse_calendar_date(value) {
        Some(date) => FormattedDate {
            iso: date.format("%Y-%m-%d").to_string(),
            readable: format!(
                "{:02} {} {}",
                date.day(),
                MONTHS[date.month0() as usize],
                date.year()
            ),
        },
        None => {
            warn!(%value, "Unrecognized date; leaving it empty");
            FormattedDate::default()
        }
    }
}
