//! # Centralized Error Handling
//!
//! This module defines the application-wide error type [`AppError`] shared by the chain
//! client and the dashboard. It follows the `thiserror` pattern for ergonomic error handling.
//!
//! ## Error Categories
//!
//! 1. **User errors** - bad input
//!    - [`InvalidInput`](AppError::InvalidInput)
//!
//! 2. **External errors** - the node or the price API misbehaved
//!    - [`Rpc`](AppError::Rpc)
//!    - [`Price`](AppError::Price)
//!    - [`Transaction`](AppError::Transaction)
//!
//! 3. **Internal errors**
//!    - [`Config`](AppError::Config)
//!    - [`Decoding`](AppError::Decoding)
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{AppError, Result};
//!
//! fn parse_shares(raw: &str) -> Result<f64> {
//!     raw.parse::<f64>()
//!         .map_err(|_| AppError::InvalidInput(format!("'{}' is not a number", raw)))
//! }
//! ```

use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type.
///
/// Each variant carries a descriptive `String`; the `#[error]` attribute
/// provides the `Display` implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AppError {
    /// Configuration error during startup or environment loading.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON-RPC failure (network, rate limit, revert on a read).
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Contract return data or API payload could not be decoded.
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Invalid user input validation error.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transaction error (building, signing, submission, revert).
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Spot price feed failure.
    #[error("Price error: {0}")]
    Price(String),
}

impl AppError {
    /// The bare message carried by the variant, without the category prefix.
    pub fn detail(&self) -> &str {
        match self {
            AppError::Config(msg)
            | AppError::Rpc(msg)
            | AppError::Decoding(msg)
            | AppError::InvalidInput(msg)
            | AppError::Transaction(msg)
            | AppError::Price(msg) => msg,
        }
    }
}

/// Convert `serde_json::Error` to `AppError`.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decoding(format!("JSON error: {}", err))
    }
}
