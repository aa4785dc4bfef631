//! # Data Transfer Objects (DTOs)
//!
//! Decoded, unit-converted snapshots of on-chain state. Produced by the chain
//! client after every successful read batch and consumed by the dashboard
//! state and view.

pub mod vault;

pub use vault::*;
