//! # Core Abstractions
//!
//! Core traits and error types for dependency injection and better testability.
//!
//! - **[`error`]**: Application error types (`AppError`, `Result<T>`)
//! - **[`service`]**: Service traits for dependency injection (`VaultService`, `PriceService`)
//!
//! ## Dependency Injection
//!
//! ```rust,ignore
//! use dashboard::core::service::VaultService;
//!
//! // In production: the alloy-backed client
//! let vault: Arc<dyn VaultService> = Arc::new(lib_evm::VaultClient::builder().build()?);
//!
//! // In tests: the in-memory mock
//! let vault: Arc<dyn VaultService> = Arc::new(MockVault::default());
//! ```

pub mod error;
pub mod service;

#[cfg(test)]
pub(crate) mod mock;

pub use error::{AppError, Result};
pub use service::{PriceService, VaultService};
