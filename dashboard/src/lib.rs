//! # stPENDLE Vault Dashboard
//!
//! Polls the stPENDLE vault, derives display metrics and drives the vault's
//! write transactions.
//!
//! ## Architecture
//!
//! - **[`app`]**: Shared state, polling tasks, event handling and the card view
//! - **[`flows`]**: One transaction flow per write action
//! - **[`core`]**: Service traits and the dashboard error type
//! - **[`cli`]**: Command parsing for the binary
//! - **[`debug`]**: File-based logging

pub mod app;
pub mod cli;
pub mod core;
pub mod debug;
pub mod flows;

pub use app::DashboardApp;
pub use cli::Command;
