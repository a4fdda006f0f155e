// Utility helpers for parsing and number formatting.
//
// This module centralizes all the "dirty" CSV/number/date handling so the
// rest of the code can assume clean, typed values.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in CSV exports.
///
/// - Trims whitespace and a leading `$`.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    let s = s.strip_prefix('$').unwrap_or(s);
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a sale date. The public exports ship either ISO dates, ISO
/// timestamps (`2021-01-04T00:00:00`) or US style `01/04/2021`.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let day_part = s.split(['T', ' ']).next().unwrap_or(s);
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(day_part, "%m/%d/%Y"))
        .ok()
}

/// Pull the two coordinates out of a store location such as
/// `POINT (-93.61 41.59)` or `123 MAIN ST (-93.61 41.59)`.
///
/// The first number inside the parentheses is the longitude and the second
/// the latitude. Returns `(latitude, longitude)`, or `None` when the text has
/// no parenthesized pair of numbers.
pub fn parse_location(s: &str) -> Option<(f64, f64)> {
    let open = s.rfind('(')?;
    let close = open + s[open..].find(')')?;
    let mut parts = s[open + 1..close].split_whitespace();
    let lon = parts.next()?.parse::<f64>().ok()?;
    let lat = parts.next()?.parse::<f64>().ok()?;
    if parts.next().is_some() || !lat.is_finite() || !lon.is_finite() {
        return None;
    }
    Some((lat, lon))
}

/// Round to two decimal places, the precision used for share columns.
pub fn round2(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let s = format!("{:.*}", decimals, n.abs());
    // `-0.00` should print as `0.00`.
    let neg = n.is_sign_negative() && s.chars().any(|c| ('1'..='9').contains(&c));
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Use `num-format` to insert commas into the integer portion.
    // Beyond `u64` the digits are kept as they are, without separators.
    let mut res = match int_part.parse::<u64>() {
        Ok(v) => v.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Dollar amount with thousands separators, e.g. `$1,234` or `-$12.50`.
pub fn format_currency(n: f64, decimals: usize) -> String {
    let s = format_number(n, decimals);
    match s.strip_prefix('-') {
        Some(abs) => format!("-${}", abs),
        None => format!("${}", s),
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values. This is used
    // for counts in console messages (e.g., `9,855 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_f64_safe_handles_separators_and_dollars() {
        assert_eq!(parse_f64_safe(Some(" 1,234.50 ")), Some(1234.5));
        assert_eq!(parse_f64_safe(Some("$99.99")), Some(99.99));
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(Some("n/a")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn parse_date_safe_accepts_known_layouts() {
        let expected = NaiveDate::from_ymd_opt(2021, 1, 4);
        assert_eq!(parse_date_safe(Some("2021-01-04")), expected);
        assert_eq!(parse_date_safe(Some("2021-01-04T00:00:00")), expected);
        assert_eq!(parse_date_safe(Some("01/04/2021")), expected);
        assert_eq!(parse_date_safe(Some("yesterday")), None);
    }

    #[test]
    fn parse_location_reads_point_text() {
        assert_eq!(
            parse_location("POINT (-93.61 41.59)"),
            Some((41.59, -93.61))
        );
        assert_eq!(
            parse_location("1460 2ND AVE NW (-93.2 42.1)"),
            Some((42.1, -93.2))
        );
        assert_eq!(parse_location("POINT EMPTY"), None);
        assert_eq!(parse_location("POINT (abc 41.59)"), None);
        assert_eq!(parse_location("POINT (-93.61)"), None);
    }

    #[test]
    fn format_number_inserts_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-1500.0, 0), "-1,500");
        assert_eq!(format_number(-0.001, 2), "0.00");
        assert_eq!(format_number(12.0, 2), "12.00");
        assert_eq!(format_number(1e19, 0), "10,000,000,000,000,000,000");
        assert_eq!(format_number(-2e19, 0), "-20,000,000,000,000,000,000");
        assert_eq!(format_number(1e21, 0), "1000000000000000000000");
    }

    #[test]
    fn format_currency_places_sign_before_dollar() {
        assert_eq!(format_currency(1234.4, 0), "$1,234");
        assert_eq!(format_currency(-12.5, 2), "-$12.50");
    }
}
