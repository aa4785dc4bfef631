//! # Logging
//!
//! File-based structured logging for the dashboard binary.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (default `dashboard=info,lib_evm=info,warn`)
//! - `DASHBOARD_LOG_DIR`: Directory for the daily-rotated log (default `logs`)
//! - `DASHBOARD_LOG_STDERR`: Also log to stderr (1=on, 0=off)

pub mod config;
pub mod logger;

pub use config::LogConfig;
pub use logger::{init as init_logger, LogGuard};
