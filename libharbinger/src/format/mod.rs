//! Human-readable data formatting utilities.
//!
//! Sizes use decimal units with no space between value and unit and keep at
//! most four significant digits (`0B`, `1.5kB`, `1.235MB`). Timestamps are
//! printed as RFC 3339.

use chrono::{DateTime, SecondsFormat, Utc};
use humansize::{DECIMAL, FormatSizeOptions, format_size as format_size_human};


/// Formats a byte size into a compact human-readable string using decimal units.
///
/// # Examples
///
/// ```
/// use libharbinger::format::format_size;
///
/// assert_eq!(format_size(0), "0B");
/// assert_eq!(format_size(1000 * 1000 * 5), "5MB");
/// assert_eq!(format_size(1_234_567), "1.235MB");
/// ```
pub fn format_size(size_bytes: u64) -> String {
    let options = FormatSizeOptions::from(DECIMAL)
        .space_after_value(false)
        .decimal_places(decimal_places(size_bytes));
    trim_fraction(&format_size_human(size_bytes, options))
}

const SIGNIFICANT_DIGITS: usize = 4;
const LARGEST_UNIT_EXPONENT: usize = 8;

/// Decimals needed to show `SIGNIFICANT_DIGITS` digits once scaled to its unit.
fn decimal_places(size_bytes: u64) -> usize {
    let mut scaled = size_bytes as f64;
    let mut exponent = 0;
    while scaled >= 1000.0 && exponent < LARGEST_UNIT_EXPONENT {
        scaled /= 1000.0;
        exponent += 1;
    }

    let integer_digits = if scaled < 1.0 {
        1
    } else {
        scaled.log10().floor() as usize + 1
    };
    SIGNIFICANT_DIGITS.saturating_sub(integer_digits)
}

/// Drops trailing fractional zeros: `1.500kB` becomes `1.5kB`.
fn trim_fraction(formatted: &str) -> String {
    let split = formatted
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(formatted.len());
    let (number, unit) = formatted.split_at(split);

    if number.contains('.') {
        format!("{}{}", number.trim_end_matches('0').trim_end_matches('.'), unit)
    } else {
        formatted.to_string()
    }
}

/// Formats a manifest creation time as RFC 3339 with its offset.
///
/// # Examples
///
/// ```
/// use libharbinger::format::format_created;
/// use chrono::{TimeZone, Utc};
///
/// let created = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
/// assert_eq!(format_created(&created), "2024-01-02T03:04:05Z");
/// ```
pub fn format_created(created: &DateTime<Utc>) -> String {
    created.to_rfc3339_opts(SecondsFormat::Secs, true)
}
