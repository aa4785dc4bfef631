//! # Service Traits
//!
//! Traits for dependency injection, enabling better testability and modularity.
//! Tasks and flows only see these traits; production wires in
//! [`lib_evm::VaultClient`] and [`lib_evm::CoinGeckoClient`].

use crate::core::error::Result;
use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use lib_core::dto::{RedemptionQueue, UserBalances, VaultInfo, VaultMetrics};
use lib_evm::{CoinGeckoClient, ReceiptSummary, VaultCall, VaultClient};

/// Trait for vault reads and writes.
#[async_trait]
pub trait VaultService: Send + Sync {
    /// Vault contract address (approval spender)
    fn vault_address(&self) -> Address;

    /// Signer used for writes, if configured
    fn signer_address(&self) -> Option<Address>;

    async fn vault_metrics(&self) -> Result<VaultMetrics>;

    async fn user_balances(&self, account: Address) -> Result<UserBalances>;

    /// Queue state with the requested total read for `epoch`
    async fn redemption_queue(&self, epoch: u64) -> Result<RedemptionQueue>;

    async fn vault_info(&self) -> Result<VaultInfo>;

    /// Underlying-token allowance `owner` granted the vault
    async fn allowance(&self, owner: Address) -> Result<U256>;

    async fn fee_token(&self) -> Result<Address>;

    /// Sign and send; resolves once the node returns a hash
    async fn submit(&self, call: VaultCall) -> Result<TxHash>;

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<ReceiptSummary>;
}

/// Trait for the spot price feed.
#[async_trait]
pub trait PriceService: Send + Sync {
    /// USD price of `coin_id`
    async fn spot_price(&self, coin_id: &str) -> Result<f64>;
}

// Implement the traits for the concrete clients
#[async_trait]
impl VaultService for VaultClient {
    fn vault_address(&self) -> Address {
        VaultClient::vault_address(self)
    }

    fn signer_address(&self) -> Option<Address> {
        VaultClient::signer_address(self)
    }

    async fn vault_metrics(&self) -> Result<VaultMetrics> {
        Ok(VaultClient::vault_metrics(self).await?)
    }

    async fn user_balances(&self, account: Address) -> Result<UserBalances> {
        Ok(VaultClient::user_balances(self, account).await?)
    }

    async fn redemption_queue(&self, epoch: u64) -> Result<RedemptionQueue> {
        Ok(VaultClient::redemption_queue(self, epoch).await?)
    }

    async fn vault_info(&self) -> Result<VaultInfo> {
        Ok(VaultClient::vault_info(self).await?)
    }

    async fn allowance(&self, owner: Address) -> Result<U256> {
        Ok(VaultClient::allowance(self, owner).await?)
    }

    async fn fee_token(&self) -> Result<Address> {
        Ok(VaultClient::fee_token(self).await?)
    }

    async fn submit(&self, call: VaultCall) -> Result<TxHash> {
        Ok(VaultClient::submit(self, call).await?)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<ReceiptSummary> {
        Ok(VaultClient::wait_for_receipt(self, tx_hash).await?)
    }
}

#[async_trait]
impl PriceService for CoinGeckoClient {
    async fn spot_price(&self, coin_id: &str) -> Result<f64> {
        Ok(self.get_price(coin_id).await?)
    }
}
