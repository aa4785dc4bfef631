//! # EVM Library
//!
//! stPENDLE vault integration: typed contract bindings, a read/write RPC client,
//! unit conversion helpers and the spot price feed.

pub mod abi;
pub mod calls;
pub mod client;
pub mod error;
pub mod price;
pub mod types;
pub mod units;

// Re-export commonly used types from root for convenience
pub use calls::VaultCall;
pub use client::{ReceiptSummary, VaultClient, VaultClientBuilder};
pub use error::EvmError;
pub use price::CoinGeckoClient;
pub use units::{parse_amount, to_decimal, to_decimal_text};

pub use alloy::primitives::{Address, TxHash, B256, U256};
