//! Error type for chain client operations.

use alloy::contract::Error as ContractError;
use alloy::primitives::utils::UnitsError;
use alloy::transports::TransportError;
use lib_core::AppError;

#[derive(Debug, thiserror::Error)]
pub enum EvmError {
    #[error("Contract error: {0}")]
    Contract(#[from] ContractError),
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("Units error: {0}")]
    Units(#[from] UnitsError),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid RPC URL '{0}'")]
    InvalidRpcUrl(String),
    #[error("Invalid address '{0}'")]
    InvalidAddress(String),
    #[error("Invalid signer key: {0}")]
    InvalidSigner(String),
    #[error("No signer configured; set WALLET_PRIVATE_KEY to enable writes")]
    NoSigner,
    #[error("{field} does not fit in u64")]
    Overflow { field: &'static str },
    #[error("{0}")]
    Submission(String),
    #[error("No receipt for {tx_hash} after {waited_secs}s")]
    ReceiptTimeout { tx_hash: String, waited_secs: u64 },
    #[error("RPC serves chain {actual}, expected {expected}")]
    ChainMismatch { expected: u64, actual: u64 },
    #[error("{0}")]
    Price(String),
}

impl From<EvmError> for AppError {
    fn from(err: EvmError) -> Self {
        match err {
            EvmError::Contract(e) => AppError::Rpc(e.to_string()),
            EvmError::Transport(e) => AppError::Rpc(e.to_string()),
            EvmError::Units(e) => AppError::Decoding(e.to_string()),
            EvmError::Overflow { .. } => AppError::Decoding(err.to_string()),
            EvmError::InvalidAddress(_) => AppError::InvalidInput(err.to_string()),
            EvmError::InvalidRpcUrl(_)
            | EvmError::InvalidSigner(_)
            | EvmError::NoSigner
            | EvmError::ChainMismatch { .. } => AppError::Config(err.to_string()),
            EvmError::Submission(msg) => AppError::Transaction(msg),
            EvmError::ReceiptTimeout { .. } => AppError::Transaction(err.to_string()),
            EvmError::Http(e) => AppError::Price(e.to_string()),
            EvmError::Price(msg) => AppError::Price(msg),
        }
    }
}
