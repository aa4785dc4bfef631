//! # Formatting Utilities
//!
//! Number and message formatting for dashboard output.
//!
//! - [`format_number`] - Format numbers with comma separators
//! - [`format_optional`] - Same, with `--` for missing values
//! - [`format_usd`] - Dollar amounts with two decimals
//! - [`truncate_message`] - Cut an error message to a character budget

/// Placeholder shown for missing or not-yet-loaded values.
pub const PLACEHOLDER: &str = "--";

/// Format a number with commas (e.g., 1234567.89 -> "1,234,567.89")
///
/// # Examples
///
/// ```rust
/// use lib_utils::format::format_number;
///
/// assert_eq!(format_number(1234567.89, 2), "1,234,567.89");
/// assert_eq!(format_number(100.0, 2), "100.00");
/// assert_eq!(format_number(-1234.5, 1), "-1,234.5");
/// ```
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }

    let formatted = format!("{:.prec$}", value.abs(), prec = decimals);
    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((int, dec)) => (int, dec),
        None => (formatted.as_str(), ""),
    };

    // Add commas to integer part
    let mut result = String::new();
    for (i, ch) in integer_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }

    let integer_with_commas: String = result.chars().rev().collect();
    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };

    if decimal_part.is_empty() {
        format!("{}{}", sign, integer_with_commas)
    } else {
        format!("{}{}.{}", sign, integer_with_commas, decimal_part)
    }
}

/// Format an optional number, rendering `None` as `--`.
pub fn format_optional(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format_number(v, decimals))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Format a dollar amount; zero or missing values render as `--`.
pub fn format_usd(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 && v.is_finite() => format!("${:.2}", v),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Cut `message` to at most `budget` characters.
pub fn truncate_message(message: &str, budget: usize) -> String {
    message.chars().take(budget).collect()
}
