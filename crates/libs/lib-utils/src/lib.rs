//! # Utilities Library
//!
//! Shared utility functions for environment variables, time, number formatting, and validation.

pub mod envs;
pub mod format;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use envs::{get_env_or, get_env_parse_or};
pub use format::{format_number, format_optional, format_usd, truncate_message};
pub use time::{format_distance_strict, now_unix};
pub use validation::{validate_address_format, validate_positive_amount};
