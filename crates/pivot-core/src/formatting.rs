//! Numeric parsing and formatting in the pt-BR convention used by the pivot
//! exports: `.` groups thousands and `,` marks the decimal point.

/// Parse a number written with `.` thousands separators and a `,` decimal
/// separator.
///
/// Every `.` is removed, then every `,` becomes `.`, and the result is parsed
/// as a float. Returns `None` for blank text or anything that does not parse
/// to a finite value.
///
/// # Examples
///
/// ```
/// use pivot_core::formatting::parse_locale_number;
///
/// assert_eq!(parse_locale_number("1.234,5"), Some(1234.5));
/// assert_eq!(parse_locale_number("12,0"), Some(12.0));
/// assert_eq!(parse_locale_number("abc"), None);
/// assert_eq!(parse_locale_number(""), None);
/// ```
pub fn parse_locale_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalised = trimmed.replace('.', "").replace(',', ".");
    normalised
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Format a number with `.` thousands separators and a `,` decimal point.
///
/// # Examples
///
/// ```
/// use pivot_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1.234,5");
/// assert_eq!(format_number(1234567.0, 0), "1.234.567");
/// assert_eq!(format_number(0.0, 2), "0,00");
/// assert_eq!(format_number(-9876.5, 1), "-9.876,5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by a relative epsilon so exact binary midpoints round away from zero.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // `frac_str` looks like "0.50"; keep only the digits after the point.
        let decimal_digits = &frac_str[2..];
        format!("{},{}", grouped, decimal_digits)
    };

    if negative && rounded != 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Shortest plain rendering of a count: `10.0` becomes `"10"`, `2.5` stays
/// `"2.5"`. Uses `.` as the decimal point, with no grouping, for
/// machine-readable exports.
pub fn format_plain(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

/// Label for an hour-of-day column, e.g. `"08h"`.
pub fn format_hour(hour: u8) -> String {
    format!("{:02}h", hour)
}

/// Insert dots every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push('.');
        }
        result.push(c);
    }
    result
}
