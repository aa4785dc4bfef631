//! # Raw Read Results
//!
//! Integer results exactly as returned by the contract, one struct per read
//! batch. Conversion into the decimal DTOs of [`lib_core::dto`] happens here
//! and is the only place where raw units are interpreted.
//!
//! Timestamps and epoch counters are `uint256` on-chain; a value that does not
//! fit in `u64` is rejected as [`EvmError::Overflow`] instead of being truncated.

use crate::error::EvmError;
use crate::units::{to_decimal, to_decimal_text};
use alloy::primitives::{Address, U256};
use lib_core::dto::{RedemptionQueue, UserBalances, VaultInfo, VaultMetrics, SHARE_DECIMALS};

fn to_u64(value: U256, field: &'static str) -> Result<u64, EvmError> {
    u64::try_from(value).map_err(|_| EvmError::Overflow { field })
}

/// The seven vault-state reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawVaultState {
    pub total_assets: U256,
    pub total_locked_pendle: U256,
    pub total_supply: U256,
    pub current_epoch: U256,
    pub epoch_duration: U256,
    pub current_epoch_start: U256,
    pub pre_lock_redemption_period: U256,
}

impl RawVaultState {
    /// Decode using the underlying asset's decimals for asset-denominated fields.
    pub fn into_metrics(self, asset_decimals: u8) -> Result<VaultMetrics, EvmError> {
        Ok(VaultMetrics {
            total_assets: to_decimal(self.total_assets, asset_decimals),
            total_locked_pendle: to_decimal(self.total_locked_pendle, asset_decimals),
            total_supply: to_decimal(self.total_supply, SHARE_DECIMALS),
            current_epoch: to_u64(self.current_epoch, "currentEpoch")?,
            epoch_duration: to_u64(self.epoch_duration, "epochDuration")?,
            current_epoch_start: to_u64(self.current_epoch_start, "currentEpochStart")?,
            pre_lock_redemption_period: to_u64(self.pre_lock_redemption_period, "preLockRedemptionPeriod")?,
        })
    }
}

/// Account reads: vault shares, queued redemption and the asset's ERC-20 balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUserState {
    pub account: Address,
    pub share_balance: U256,
    pub requested_redemption_shares: U256,
    pub asset: Address,
    pub token_balance: U256,
    pub token_decimals: u8,
}

impl RawUserState {
    pub fn into_balances(self) -> UserBalances {
        UserBalances {
            account: self.account.to_string(),
            share_balance: to_decimal(self.share_balance, SHARE_DECIMALS),
            token_balance: to_decimal(self.token_balance, self.token_decimals),
            share_balance_text: to_decimal_text(self.share_balance, SHARE_DECIMALS),
            token_balance_text: to_decimal_text(self.token_balance, self.token_decimals),
            requested_redemption_shares: to_decimal(self.requested_redemption_shares, SHARE_DECIMALS),
            token_address: self.asset.to_string(),
            token_decimals: self.token_decimals,
        }
    }
}

/// Redemption queue reads for one epoch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQueueState {
    pub current_epoch: U256,
    pub requested_shares: U256,
    pub available: U256,
    pub total_assets: U256,
    pub total_supply: U256,
}

impl RawQueueState {
    pub fn into_queue(self, asset_decimals: u8) -> Result<RedemptionQueue, EvmError> {
        Ok(RedemptionQueue {
            epoch: to_u64(self.current_epoch, "currentEpoch")?,
            shares_queued: to_decimal(self.requested_shares, SHARE_DECIMALS),
            available: to_decimal(self.available, asset_decimals),
            total_assets: to_decimal(self.total_assets, asset_decimals),
            total_supply: to_decimal(self.total_supply, SHARE_DECIMALS),
        })
    }
}

/// Underlying asset with optional metadata; missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAssetInfo {
    pub asset: Address,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
}

impl RawAssetInfo {
    pub fn into_info(self) -> VaultInfo {
        let mut info = VaultInfo::with_defaults(self.asset.to_string());
        if let Some(symbol) = self.symbol.filter(|s| !s.is_empty()) {
            info.asset_symbol = symbol;
        }
        if let Some(decimals) = self.decimals {
            info.asset_decimals = decimals;
        }
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wei(whole: u64) -> U256 {
        U256::from(whole) * U256::from(10u64).pow(U256::from(18u64))
    }

    #[test]
    fn test_vault_state_decoding() {
        let raw = RawVaultState {
            total_assets: wei(200),
            total_locked_pendle: wei(150),
            total_supply: wei(100),
            current_epoch: U256::from(3u64),
            epoch_duration: U256::from(604_800u64),
            current_epoch_start: U256::from(1_000u64),
            pre_lock_redemption_period: U256::from(100u64),
        };
        let metrics = raw.into_metrics(18).unwrap();
        assert_eq!(metrics.total_assets, 200.0);
        assert_eq!(metrics.nav_per_share(), 2.0);
        assert_eq!(metrics.current_epoch, 3);
        assert_eq!(metrics.epoch_duration_days(), 7.0);
    }

    #[test]
    fn test_oversized_epoch_is_rejected() {
        let raw = RawVaultState {
            current_epoch: U256::MAX,
            ..Default::default()
        };
        assert!(matches!(
            raw.into_metrics(18),
            Err(EvmError::Overflow { field: "currentEpoch" })
        ));
    }

    #[test]
    fn test_user_state_uses_token_decimals() {
        let raw = RawUserState {
            account: Address::ZERO,
            share_balance: wei(5),
            requested_redemption_shares: wei(1),
            asset: Address::repeat_byte(0x22),
            token_balance: U256::from(2_500_000u64),
            token_decimals: 6,
        };
        let balances = raw.into_balances();
        assert_eq!(balances.share_balance, 5.0);
        assert_eq!(balances.token_balance, 2.5);
        assert_eq!(balances.requested_redemption_shares, 1.0);
        assert_eq!(balances.token_balance_text, "2.5");
    }

    #[test]
    fn test_balance_text_keeps_every_digit() {
        let raw = U256::from(1_234_567_890_123_456_789_012u128);
        let balances = RawUserState {
            account: Address::ZERO,
            share_balance: raw,
            requested_redemption_shares: U256::ZERO,
            asset: Address::ZERO,
            token_balance: raw,
            token_decimals: 18,
        }
        .into_balances();
        assert_eq!(balances.share_balance_text, "1234.567890123456789012");
        assert_eq!(balances.token_balance_text, "1234.567890123456789012");
        assert!(crate::units::parse_amount(&balances.token_balance_text, 18) <= raw);
    }

    #[test]
    fn test_asset_info_defaults() {
        let info = RawAssetInfo {
            asset: Address::ZERO,
            symbol: None,
            decimals: None,
        }
        .into_info();
        assert_eq!(info.asset_symbol, "PENDLE");
        assert_eq!(info.asset_decimals, 18);

        let info = RawAssetInfo {
            asset: Address::ZERO,
            symbol: Some("vePENDLE".into()),
            decimals: Some(8),
        }
        .into_info();
        assert_eq!(info.asset_symbol, "vePENDLE");
        assert_eq!(info.asset_decimals, 8);
    }
}
