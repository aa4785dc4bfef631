//! # Vault Snapshots
//!
//! Every amount here is already converted from raw integer units to a decimal
//! (`formatUnits` semantics), so arithmetic in [`crate::metrics`] can use it directly.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "total_assets": 200.0,
//!   "total_locked_pendle": 150.0,
//!   "total_supply": 100.0,
//!   "current_epoch": 3,
//!   "epoch_duration": 604800,
//!   "current_epoch_start": 1717000000,
//!   "pre_lock_redemption_period": 86400
//! }
//! ```

use crate::metrics::{self, MarketSignals, WindowStatus};
use serde::{Deserialize, Serialize};

/// Decimals of the stPENDLE share token.
pub const SHARE_DECIMALS: u8 = 18;

/// Vault-wide state from the seven metric reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaultMetrics {
    pub total_assets: f64,
    pub total_locked_pendle: f64,
    pub total_supply: f64,
    pub current_epoch: u64,
    /// Seconds
    pub epoch_duration: u64,
    /// Unix seconds
    pub current_epoch_start: u64,
    /// Seconds after epoch start during which redemptions can be claimed
    pub pre_lock_redemption_period: u64,
}

impl VaultMetrics {
    pub fn nav_per_share(&self) -> f64 {
        metrics::nav_per_share(self.total_assets, self.total_supply)
    }

    pub fn epoch_duration_days(&self) -> f64 {
        metrics::seconds_to_days(self.epoch_duration)
    }

    pub fn window_status(&self, now: u64) -> WindowStatus {
        metrics::window_time_remaining(self.current_epoch_start, self.pre_lock_redemption_period, now)
    }

    pub fn is_window_open(&self, now: u64) -> bool {
        metrics::is_within_window(self.current_epoch_start, self.pre_lock_redemption_period, now)
    }

    /// Deposits before the first epoch go through `depositBeforeFirstEpoch`.
    pub fn is_pre_launch(&self) -> bool {
        self.current_epoch == 0
    }

    pub fn market_signals(&self, spot: f64) -> MarketSignals {
        MarketSignals::compute(self.nav_per_share(), spot)
    }
}

/// Balances for one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBalances {
    pub account: String,
    /// stPENDLE shares
    pub share_balance: f64,
    /// Underlying token held in the wallet
    pub token_balance: f64,
    /// Exact `formatUnits` text of `share_balance`; the f64 can round up
    pub share_balance_text: String,
    /// Exact `formatUnits` text of `token_balance`
    pub token_balance_text: String,
    /// Shares the account has queued for redemption
    pub requested_redemption_shares: f64,
    pub token_address: String,
    pub token_decimals: u8,
}

/// Redemption queue state for one epoch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedemptionQueue {
    pub epoch: u64,
    pub shares_queued: f64,
    /// Unlocked underlying available to pay redemptions
    pub available: f64,
    pub total_assets: f64,
    pub total_supply: f64,
}

impl RedemptionQueue {
    pub fn nav_per_share(&self) -> f64 {
        metrics::nav_per_share(self.total_assets, self.total_supply)
    }

    pub fn estimated_epochs_to_clear(&self) -> Option<u64> {
        metrics::estimated_epochs_to_clear(self.shares_queued, self.nav_per_share(), self.available)
    }

    pub fn estimated_underlying_needed(&self) -> f64 {
        metrics::estimated_underlying_needed(self.shares_queued, self.nav_per_share())
    }
}

/// Underlying asset of the vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultInfo {
    pub asset_address: String,
    pub asset_symbol: String,
    pub asset_decimals: u8,
}

impl VaultInfo {
    pub const DEFAULT_SYMBOL: &'static str = "PENDLE";
    pub const DEFAULT_DECIMALS: u8 = 18;

    pub fn with_defaults(asset_address: impl Into<String>) -> Self {
        Self {
            asset_address: asset_address.into(),
            asset_symbol: Self::DEFAULT_SYMBOL.to_string(),
            asset_decimals: Self::DEFAULT_DECIMALS,
        }
    }
}
