//! # Core Library
//!
//! Configuration, error types, display DTOs and the derived-metrics layer shared by
//! the chain client and the dashboard.

pub mod config;
pub mod dto;
pub mod error;
pub mod metrics;
pub mod proof;

// Re-export commonly used types
pub use config::{Config, NetworkKind, PollIntervals};
pub use error::{AppError, Result};
