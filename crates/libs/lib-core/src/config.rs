//! # Application Configuration
//!
//! This module manages configuration loaded from environment variables.
//! All configuration is validated on startup to fail fast if misconfigured.
//!
//! The configuration is a plain value: build it once with [`Config::load()`] and
//! hand it to whatever needs it.
//!
//! ```rust,no_run
//! use lib_core::config::Config;
//!
//! let config = Config::load()?;
//! println!("{} on {}", config.app_name, config.chain_name);
//! # Ok::<(), lib_core::AppError>(())
//! ```

use crate::error::{AppError, Result};
use lib_utils::envs::{get_env_or, get_env_parse_or};
use lib_utils::validation::validate_address_format;
use std::time::Duration;

/// Placeholder for unset contract addresses.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Network name used by the local development chain.
const LOCAL_NETWORK: &str = "anvil";

/// Configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// Display name of the application
    pub app_name: String,

    /// EVM chain id the RPC endpoint is expected to serve
    pub chain_id: u64,

    /// Human-readable chain name
    pub chain_name: String,

    /// Network identifier (`mainnet`, `sepolia`, `anvil`, ...)
    ///
    /// `anvil` switches polling to local intervals and pins the spot price to 1.0.
    pub chain_network: String,

    /// Native currency symbol
    pub native_symbol: String,

    /// Native currency decimals
    pub native_decimals: u8,

    /// Block explorer base URL (no trailing slash)
    pub explorer_url: String,

    /// JSON-RPC endpoint
    pub rpc_url: String,

    /// WalletConnect project id (informational; no wallet UI is shipped)
    pub walletconnect_project_id: String,

    /// stPENDLE vault contract address
    pub stpendle_address: String,

    /// Underlying PENDLE token address (allowance/approve target)
    pub pendle_token_address: String,

    /// CoinGecko asset id used for the spot price
    pub pendle_coingecko_id: String,

    /// Hex private key for signing; writes are disabled when absent
    pub wallet_private_key: Option<String>,
}

impl Config {
    /// Load `.env` (if present), read the environment and validate.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let config = Self::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let chain_id = get_env_parse_or("CHAIN_ID", 1u64)
            .map_err(|e| AppError::Config(format!("CHAIN_ID must be a valid number: {}", e)))?;

        let native_decimals = get_env_parse_or("CHAIN_DECIMALS", 18u8)
            .map_err(|e| AppError::Config(format!("CHAIN_DECIMALS must be a valid number: {}", e)))?;

        let wallet_private_key = std::env::var("WALLET_PRIVATE_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        Ok(Self {
            app_name: "stPENDLE Vault".to_string(),
            chain_id,
            chain_name: get_env_or("CHAIN_NAME", "Ethereum Mainnet"),
            chain_network: get_env_or("CHAIN_NETWORK", "mainnet"),
            native_symbol: get_env_or("CHAIN_SYMBOL", "ETH"),
            native_decimals,
            explorer_url: get_env_or("CHAIN_EXPLORER", "https://etherscan.io")
                .trim_end_matches('/')
                .to_string(),
            rpc_url: get_env_or("RPC_URL", "https://mainnet.infura.io/v3/YOUR_KEY"),
            walletconnect_project_id: get_env_or("WALLETCONNECT_PROJECT_ID", ""),
            stpendle_address: get_env_or("STPENDLE_ADDRESS", ZERO_ADDRESS),
            pendle_token_address: get_env_or("PENDLE_ADDRESS", ZERO_ADDRESS),
            pendle_coingecko_id: get_env_or("PENDLE_COINGECKO_ID", "pendle"),
            wallet_private_key,
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.chain_id == 0 {
            return Err(AppError::Config("CHAIN_ID must be greater than 0".to_string()));
        }

        if !(self.rpc_url.starts_with("http://") || self.rpc_url.starts_with("https://")) {
            return Err(AppError::Config("RPC_URL must be an http(s) URL".to_string()));
        }

        validate_address_format(&self.stpendle_address)
            .map_err(|e| AppError::Config(format!("STPENDLE_ADDRESS: {}", e)))?;
        validate_address_format(&self.pendle_token_address)
            .map_err(|e| AppError::Config(format!("PENDLE_ADDRESS: {}", e)))?;

        if self.pendle_coingecko_id.trim().is_empty() {
            return Err(AppError::Config("PENDLE_COINGECKO_ID cannot be empty".to_string()));
        }

        if self.stpendle_address == ZERO_ADDRESS {
            tracing::warn!("STPENDLE_ADDRESS is the zero address; reads will return defaults or revert");
        }

        Ok(())
    }

    /// Kind of network, derived from `chain_network`.
    pub fn network_kind(&self) -> NetworkKind {
        NetworkKind::from_name(&self.chain_network)
    }

    /// Polling intervals for this network.
    pub fn poll_intervals(&self) -> PollIntervals {
        PollIntervals::for_network(self.network_kind())
    }

    /// Explorer link for a transaction hash.
    pub fn explorer_tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url, tx_hash)
    }
}

/// Local development chain or a real network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkKind {
    /// Local anvil node: fast polling, spot price pinned to 1.0
    Local,
    /// Any public network (mainnet, testnets)
    Remote,
}

impl NetworkKind {
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case(LOCAL_NETWORK) {
            NetworkKind::Local
        } else {
            NetworkKind::Remote
        }
    }

    pub fn is_local(self) -> bool {
        self == NetworkKind::Local
    }
}

/// Refetch intervals for each polling task.
///
/// `price` is `None` when the price feed is disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollIntervals {
    pub vault_metrics: Duration,
    pub user_balances: Duration,
    pub redemption_queue: Duration,
    pub price: Option<Duration>,
    /// How often pending transactions are checked for a receipt
    pub receipt: Duration,
}

impl PollIntervals {
    pub fn for_network(kind: NetworkKind) -> Self {
        match kind {
            NetworkKind::Local => Self {
                vault_metrics: Duration::from_secs(5),
                user_balances: Duration::from_secs(5),
                redemption_queue: Duration::from_secs(10),
                price: None,
                receipt: Duration::from_secs(1),
            },
            NetworkKind::Remote => Self {
                vault_metrics: Duration::from_secs(30),
                user_balances: Duration::from_secs(15),
                redemption_queue: Duration::from_secs(60),
                price: Some(Duration::from_secs(60)),
                receipt: Duration::from_secs(12),
            },
        }
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        app_name: "stPENDLE Vault".to_string(),
        chain_id: 31337,
        chain_name: "Anvil".to_string(),
        chain_network: "anvil".to_string(),
        native_symbol: "ETH".to_string(),
        native_decimals: 18,
        explorer_url: "https://etherscan.io".to_string(),
        rpc_url: "http://127.0.0.1:8545".to_string(),
        walletconnect_project_id: String::new(),
        stpendle_address: "0x1111111111111111111111111111111111111111".to_string(),
        pendle_token_address: "0x2222222222222222222222222222222222222222".to_string(),
        pendle_coingecko_id: "pendle".to_string(),
        wallet_private_key: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_rpc_and_addresses() {
        let mut config = test_config();
        config.rpc_url = "ws://127.0.0.1:8545".to_string();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));

        let mut config = test_config();
        config.stpendle_address = "0x1234".to_string();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));

        let mut config = test_config();
        config.chain_id = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_network_kind_and_intervals() {
        let config = test_config();
        assert_eq!(config.network_kind(), NetworkKind::Local);
        assert_eq!(config.poll_intervals().price, None);
        assert_eq!(config.poll_intervals().user_balances, Duration::from_secs(5));

        let remote = PollIntervals::for_network(NetworkKind::from_name("mainnet"));
        assert_eq!(remote.vault_metrics, Duration::from_secs(30));
        assert_eq!(remote.redemption_queue, Duration::from_secs(60));
        assert_eq!(remote.price, Some(Duration::from_secs(60)));
        assert!(NetworkKind::from_name("ANVIL").is_local());
    }

    #[test]
    fn test_explorer_tx_link() {
        let config = test_config();
        assert_eq!(config.explorer_tx_url("0xabc"), "https://etherscan.io/tx/0xabc");
    }
}
