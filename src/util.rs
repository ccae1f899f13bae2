// Utility helpers for parsing and display formatting.
//
// This module centralizes the "dirty" handling of sheet values so the rest
// of the code can assume clean, typed data.
use chrono::{NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};

/// Trim a raw sheet value and collapse empty strings to `None`.
///
/// Accepts `Option<String>` so callers can pass raw CSV fields through
/// without unwrapping first.
pub fn clean_text(s: Option<String>) -> Option<String> {
    let s = s?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a boolean-ish sheet value (`1`/`0`, `TRUE`/`FALSE`, `Yes`/`No`).
///
/// Missing or unrecognized values are treated as `false`; the error column
/// is only meaningful when the form explicitly flagged the row.
pub fn parse_flag(s: Option<&str>) -> bool {
    let Some(s) = s else {
        return false;
    };
    let s = s.trim();
    if let Ok(n) = s.parse::<i64>() {
        return n != 0;
    }
    matches!(s.to_ascii_lowercase().as_str(), "true" | "yes" | "y")
}

/// Timestamp formats observed in sheet exports. Tried in order; date-only
/// forms resolve to midnight.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a response timestamp while being forgiving about the format the
/// export used. Returns `None` for anything unrecognized rather than
/// failing the row.
pub fn parse_timestamp(s: Option<&str>) -> Option<NaiveDateTime> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Round to one decimal place. Used for the completion KPI, which the
/// dashboard reports at one-decimal precision.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Render a percentage cell with the fixed one-decimal display format.
pub fn display_pct(value: &f64) -> String {
    format!("{:.1}", value)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for counts in console output
    // (e.g., `12,800 responses`).
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_trims_and_drops_empties() {
        assert_eq!(clean_text(Some("  Sweden ".to_string())), Some("Sweden".to_string()));
        assert_eq!(clean_text(Some("   ".to_string())), None);
        assert_eq!(clean_text(None), None);
    }

    #[test]
    fn parse_flag_accepts_numeric_and_textual_forms() {
        assert!(parse_flag(Some("1")));
        assert!(parse_flag(Some("TRUE")));
        assert!(parse_flag(Some("yes")));
        assert!(!parse_flag(Some("0")));
        assert!(!parse_flag(Some("FALSE")));
        assert!(!parse_flag(Some("maybe")));
        assert!(!parse_flag(None));
    }

    #[test]
    fn parse_timestamp_handles_common_export_formats() {
        let expected = NaiveDate::from_ymd_opt(2021, 8, 7)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(parse_timestamp(Some("2021-08-07 10:30:00")), Some(expected));
        assert_eq!(parse_timestamp(Some("2021/08/07 10:30:00")), Some(expected));
        assert_eq!(parse_timestamp(Some("08/07/2021 10:30:00")), Some(expected));

        let midnight = NaiveDate::from_ymd_opt(2021, 8, 7)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_timestamp(Some("2021-08-07")), Some(midnight));
        assert_eq!(parse_timestamp(Some("not a date")), None);
        assert_eq!(parse_timestamp(None), None);
    }

    #[test]
    fn round1_rounds_half_up() {
        assert_eq!(round1(1.0), 1.0);
        assert_eq!(round1(33.333), 33.3);
        assert_eq!(round1(66.666), 66.7);
    }

    #[test]
    fn display_pct_fixes_one_decimal() {
        assert_eq!(display_pct(&33.333), "33.3");
        assert_eq!(display_pct(&0.0), "0.0");
    }
}
