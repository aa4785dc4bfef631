//! # Validation Utilities
//!
//! Input validation helpers for form fields.

/// Validate that a string looks like an EVM address (`0x` followed by 40 hex digits).
///
/// This is a format check only; checksums are not verified.
pub fn validate_address_format(value: &str) -> Result<(), String> {
    let value = value.trim();
    let Some(hex) = value.strip_prefix("0x") else {
        return Err("Address must start with 0x".to_string());
    };

    if hex.len() != 40 {
        return Err("Address must be 42 characters long".to_string());
    }

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("Address contains non-hex characters".to_string());
    }

    Ok(())
}

/// Validate that an amount is strictly positive and does not exceed `max` when known.
pub fn validate_positive_amount(amount: f64, max: Option<f64>, field_name: &str) -> Result<(), String> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(format!("{} must be greater than 0", field_name));
    }

    match max {
        Some(limit) if amount > limit => Err(format!("{} exceeds available balance", field_name)),
        _ => Ok(()),
    }
}
