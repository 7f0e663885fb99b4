//! Locale-tolerant numeric and date parsing. Catalog files arrive with
//! mixed `,`/`.` thousand and decimal conventions; everything here
//! recovers bad input as `None` instead of failing.

use chrono::NaiveDate;

/// Parse a numeric string that may use either European
/// (`"1.234,56"`) or plain dotted (`"1234.56"`) notation.
///
/// - both `,` and `.` present: `.` is the thousands separator,
///   `,` the decimal mark;
/// - only `,` present: decimal comma;
/// - only `.` or neither: parsed as-is.
///
/// Garbage input yields `None`, never an error and never zero.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let has_comma = s.contains(',');
    let has_dot = s.contains('.');

    let canonical = if has_comma && has_dot {
        s.replace('.', "").replace(',', ".")
    } else if has_comma {
        s.replace(',', ".")
    } else {
        s.to_string()
    };

    canonical.parse::<f64>().ok().filter(|v| v.is_finite())
}

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];

/// Parse a campaign date. Tolerates the formats seen in vendor files
/// plus datetime strings with a time suffix; anything else is `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    // "2025-03-01 00:00:00" / "2025-03-01T00:00:00" style input: try
    // the date prefix alone. `get` refuses non-boundary slices, so a
    // multibyte character at the cut just means no prefix to try.
    if s.len() > 10 {
        if let Some(prefix) = s.get(..10) {
            for fmt in DATE_FORMATS {
                if let Ok(d) = NaiveDate::parse_from_str(prefix, fmt) {
                    return Some(d);
                }
            }
        }
    }

    None
}
