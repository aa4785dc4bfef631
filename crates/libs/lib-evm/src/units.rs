//! Conversion between raw integer token units and decimals.

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::U256;

/// Raw integer amount to a decimal, `formatUnits` style.
///
/// Returns 0.0 when `decimals` is out of range.
pub fn to_decimal(raw: U256, decimals: u8) -> f64 {
    to_decimal_text(raw, decimals).parse::<f64>().unwrap_or(0.0)
}

/// Exact `formatUnits` text, without trailing fraction zeros.
///
/// Parsing this back with [`parse_amount`] gives `raw` again, which the f64
/// of [`to_decimal`] does not guarantee past ~16 significant digits.
pub fn to_decimal_text(raw: U256, decimals: u8) -> String {
    let Ok(text) = format_units(raw, decimals) else {
        return "0".to_string();
    };
    match text.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                whole.to_string()
            } else {
                format!("{}.{}", whole, fraction)
            }
        }
        None => text,
    }
}

/// Parse user text into raw units, `parseUnits` style.
///
/// Empty, negative or malformed input yields zero, which every flow treats
/// as "not submittable".
pub fn parse_amount(text: &str, decimals: u8) -> U256 {
    let text = text.trim();
    if text.is_empty() || text.starts_with('-') {
        return U256::ZERO;
    }
    parse_units(text, decimals)
        .map(|parsed| parsed.get_absolute())
        .unwrap_or(U256::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn test_to_decimal() {
        assert_eq!(to_decimal(U256::from(ONE * 2), 18), 2.0);
        assert_eq!(to_decimal(U256::from(1_500_000u64), 6), 1.5);
        assert_eq!(to_decimal(U256::ZERO, 18), 0.0);
    }

    #[test]
    fn test_decimal_text_is_exact() {
        assert_eq!(to_decimal_text(U256::from(ONE * 2), 18), "2");
        assert_eq!(to_decimal_text(U256::from(1_500_000u64), 6), "1.5");
        assert_eq!(to_decimal_text(U256::ZERO, 18), "0");

        let raw = U256::from(1_234_567_890_123_456_789_012u128);
        let text = to_decimal_text(raw, 18);
        assert_eq!(text, "1234.567890123456789012");
        assert_eq!(parse_amount(&text, 18), raw);
        // The f64 form rounds above the balance
        assert!(parse_amount(&to_decimal(raw, 18).to_string(), 18) > raw);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1.5", 18), U256::from(ONE + ONE / 2));
        assert_eq!(parse_amount(" 10 ", 6), U256::from(10_000_000u64));
        assert_eq!(parse_amount("", 18), U256::ZERO);
        assert_eq!(parse_amount("abc", 18), U256::ZERO);
        assert_eq!(parse_amount("-1", 18), U256::ZERO);
    }
}
