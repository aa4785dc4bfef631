//! # Common Error Types
//!
//! Consolidated error handling for the dashboard application.
//!
//! ## Error Categories
//!
//! - **Chain**: RPC reads, submissions and receipts (wraps [`lib_core::AppError`])
//! - **Wallet**: signer missing or not usable for the requested action
//!
//! ## Usage Pattern
//!
//! ```rust,no_run
//! use dashboard::core::error::AppError;
//!
//! fn require_signer(signer: Option<&str>) -> Result<&str, AppError> {
//!     signer.ok_or_else(|| AppError::Wallet("WALLET_PRIVATE_KEY not set".to_string()))
//! }
//! ```

use thiserror::Error;

/// Application-wide error type covering all error scenarios in the dashboard.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AppError {
    /// Chain client failure (read, submission, receipt).
    #[error("Chain error: {0}")]
    Chain(#[from] lib_core::AppError),

    /// Signer missing or unusable.
    ///
    /// ```rust
    /// use dashboard::core::error::AppError;
    ///
    /// let err = AppError::Wallet("WALLET_PRIVATE_KEY not set".to_string());
    /// assert_eq!(err.to_string(), "Wallet error: WALLET_PRIVATE_KEY not set");
    /// ```
    #[error("Wallet error: {0}")]
    Wallet(String),
}

impl AppError {
    /// Message without the category prefix, as shown inline next to a flow.
    pub fn detail(&self) -> &str {
        match self {
            AppError::Chain(inner) => inner.detail(),
            AppError::Wallet(msg) => msg,
        }
    }
}

impl From<lib_evm::EvmError> for AppError {
    fn from(err: lib_evm::EvmError) -> Self {
        match err {
            lib_evm::EvmError::NoSigner => AppError::Wallet(err.to_string()),
            other => AppError::Chain(other.into()),
        }
    }
}

/// Convenience type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail() {
        let err = AppError::Chain(lib_core::AppError::Transaction("execution reverted".into()));
        assert_eq!(err.detail(), "execution reverted");
        assert_eq!(err.to_string(), "Chain error: Transaction error: execution reverted");
        assert_eq!(AppError::Wallet("no signer".into()).detail(), "no signer");
    }

    #[test]
    fn test_from_evm_error() {
        assert!(matches!(AppError::from(lib_evm::EvmError::NoSigner), AppError::Wallet(_)));
        let err = AppError::from(lib_evm::EvmError::Submission("nonce too low".into()));
        assert_eq!(err.detail(), "nonce too low");
    }
}
