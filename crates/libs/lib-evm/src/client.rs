//! # stPENDLE Vault Client
//!
//! A high-level wrapper around an alloy provider bound to one vault contract
//! and its underlying token.
//!
//! ## Features
//!
//! - **Typed reads**: each read batch is issued concurrently and decoded into a
//!   [`crate::types`] struct, then into a decimal DTO
//! - **Writes**: [`VaultClient::submit`] encodes a [`VaultCall`] and returns the hash
//! - **Receipts**: [`VaultClient::wait_for_receipt`] polls on a fixed interval
//! - **Health checks**: verify the RPC serves the configured chain id
//!
//! The read provider is always present. A write provider exists only when a
//! signer key was given to the builder; without it every write fails with
//! [`EvmError::NoSigner`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use lib_evm::VaultClient;
//!
//! # async fn example() -> Result<(), lib_evm::EvmError> {
//! let client = VaultClient::builder()
//!     .rpc_url("http://127.0.0.1:8545")
//!     .vault_address("0x1111111111111111111111111111111111111111")
//!     .token_address("0x2222222222222222222222222222222222222222")
//!     .build()?;
//!
//! let metrics = client.vault_metrics().await?;
//! println!("NAV per share: {}", metrics.nav_per_share());
//! # Ok(())
//! # }
//! ```

use crate::abi::{IStPendle, IERC20};
use crate::calls::VaultCall;
use crate::error::EvmError;
use crate::types::{RawAssetInfo, RawQueueState, RawUserState, RawVaultState};
use alloy::network::{EthereumWallet, ReceiptResponse};
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use lib_core::dto::{RedemptionQueue, UserBalances, VaultInfo, VaultMetrics};
use std::future::IntoFuture;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const DEFAULT_RECEIPT_POLL: Duration = Duration::from_secs(12);
const DEFAULT_RECEIPT_TIMEOUT: Duration = Duration::from_secs(300);
const DEFAULT_ASSET_DECIMALS: u8 = 18;

/// Outcome of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptSummary {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    /// `false` when the transaction reverted
    pub success: bool,
}

pub fn parse_address(value: &str) -> Result<Address, EvmError> {
    Address::from_str(value.trim()).map_err(|_| EvmError::InvalidAddress(value.to_string()))
}

/// Builder for configuring [`VaultClient`].
#[derive(Debug, Clone, Default)]
pub struct VaultClientBuilder {
    rpc_url: Option<String>,
    vault_address: Option<String>,
    token_address: Option<String>,
    private_key: Option<String>,
    asset_decimals: Option<u8>,
    receipt_poll_interval: Option<Duration>,
    receipt_timeout: Option<Duration>,
}

impl VaultClientBuilder {
    pub fn rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = Some(url.into());
        self
    }

    /// stPENDLE vault contract.
    pub fn vault_address(mut self, address: impl Into<String>) -> Self {
        self.vault_address = Some(address.into());
        self
    }

    /// Underlying token used for allowance and approve.
    pub fn token_address(mut self, address: impl Into<String>) -> Self {
        self.token_address = Some(address.into());
        self
    }

    /// Hex private key; enables the write provider.
    pub fn private_key(mut self, key: Option<String>) -> Self {
        self.private_key = key;
        self
    }

    pub fn asset_decimals(mut self, decimals: u8) -> Self {
        self.asset_decimals = Some(decimals);
        self
    }

    pub fn receipt_poll_interval(mut self, interval: Duration) -> Self {
        self.receipt_poll_interval = Some(interval);
        self
    }

    pub fn receipt_timeout(mut self, timeout: Duration) -> Self {
        self.receipt_timeout = Some(timeout);
        self
    }

    /// Build the client. No network request is made here.
    pub fn build(self) -> Result<VaultClient, EvmError> {
        let rpc_url = self.rpc_url.unwrap_or_else(|| "http://127.0.0.1:8545".to_string());
        let url = Url::parse(&rpc_url).map_err(|_| EvmError::InvalidRpcUrl(rpc_url.clone()))?;

        let vault_address = parse_address(self.vault_address.as_deref().unwrap_or_default())?;
        let token_address = parse_address(self.token_address.as_deref().unwrap_or_default())?;

        let reader = ProviderBuilder::new().connect_http(url.clone()).erased();

        let (writer, signer_address) = match self.private_key {
            Some(key) => {
                let signer = PrivateKeySigner::from_str(key.trim())
                    .map_err(|e| EvmError::InvalidSigner(e.to_string()))?;
                let address = signer.address();
                let provider = ProviderBuilder::new()
                    .wallet(EthereumWallet::from(signer))
                    .connect_http(url)
                    .erased();
                (Some(provider), Some(address))
            }
            None => (None, None),
        };

        info!(
            rpc_url = %rpc_url,
            vault = %vault_address,
            writes_enabled = writer.is_some(),
            "Vault client configured"
        );

        Ok(VaultClient {
            reader,
            writer,
            signer_address,
            vault_address,
            token_address,
            asset_decimals: self.asset_decimals.unwrap_or(DEFAULT_ASSET_DECIMALS),
            receipt_poll_interval: self.receipt_poll_interval.unwrap_or(DEFAULT_RECEIPT_POLL),
            receipt_timeout: self.receipt_timeout.unwrap_or(DEFAULT_RECEIPT_TIMEOUT),
        })
    }
}

/// Read/write client for one vault deployment.
///
/// Cheap to clone: providers are reference counted.
#[derive(Clone)]
pub struct VaultClient {
    reader: DynProvider,
    writer: Option<DynProvider>,
    signer_address: Option<Address>,
    vault_address: Address,
    token_address: Address,
    asset_decimals: u8,
    receipt_poll_interval: Duration,
    receipt_timeout: Duration,
}

impl std::fmt::Debug for VaultClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultClient")
            .field("vault_address", &self.vault_address)
            .field("token_address", &self.token_address)
            .field("signer_address", &self.signer_address)
            .finish()
    }
}

impl VaultClient {
    /// Create a new client using a builder for configuration.
    pub fn builder() -> VaultClientBuilder {
        VaultClientBuilder::default()
    }

    pub fn vault_address(&self) -> Address {
        self.vault_address
    }

    pub fn token_address(&self) -> Address {
        self.token_address
    }

    /// Address of the configured signer, if writes are enabled.
    pub fn signer_address(&self) -> Option<Address> {
        self.signer_address
    }

    fn vault(&self) -> IStPendle::IStPendleInstance<DynProvider> {
        IStPendle::new(self.vault_address, self.reader.clone())
    }

    fn erc20(&self, token: Address) -> IERC20::IERC20Instance<DynProvider> {
        IERC20::new(token, self.reader.clone())
    }

    /// Verify the RPC endpoint serves `expected_chain_id`.
    pub async fn health_check(&self, expected_chain_id: u64) -> Result<(), EvmError> {
        let actual = self.reader.get_chain_id().await?;
        if actual != expected_chain_id {
            return Err(EvmError::ChainMismatch {
                expected: expected_chain_id,
                actual,
            });
        }
        debug!(chain_id = actual, "RPC health check passed");
        Ok(())
    }

    /// The seven vault-state reads, issued concurrently.
    pub async fn read_vault_state(&self) -> Result<RawVaultState, EvmError> {
        let vault = self.vault();
        let total_assets = vault.totalAssets();
        let total_locked = vault.totalLockedPendle();
        let total_supply = vault.totalSupply();
        let current_epoch = vault.getCurrentEpoch();
        let epoch_duration = vault.epochDuration();
        let epoch_start = vault.currentEpochStart();
        let redemption_period = vault.preLockRedemptionPeriod();

        let (
            total_assets,
            total_locked_pendle,
            total_supply,
            current_epoch,
            epoch_duration,
            current_epoch_start,
            pre_lock_redemption_period,
        ) = tokio::try_join!(
            total_assets.call().into_future(),
            total_locked.call().into_future(),
            total_supply.call().into_future(),
            current_epoch.call().into_future(),
            epoch_duration.call().into_future(),
            epoch_start.call().into_future(),
            redemption_period.call().into_future(),
        )?;

        Ok(RawVaultState {
            total_assets,
            total_locked_pendle,
            total_supply,
            current_epoch,
            epoch_duration,
            current_epoch_start,
            pre_lock_redemption_period,
        })
    }

    pub async fn vault_metrics(&self) -> Result<VaultMetrics, EvmError> {
        self.read_vault_state().await?.into_metrics(self.asset_decimals)
    }

    /// Share balance, asset and queued redemption, then the asset's ERC-20
    /// balance and decimals for `account`.
    pub async fn read_user_state(&self, account: Address) -> Result<RawUserState, EvmError> {
        let vault = self.vault();
        let share_balance = vault.balanceOf(account);
        let asset = vault.asset();
        let requested = vault.getUserAvailableRedemption(account);

        let (share_balance, asset, requested_redemption_shares) = tokio::try_join!(
            share_balance.call().into_future(),
            asset.call().into_future(),
            requested.call().into_future(),
        )?;

        let token = self.erc20(asset);
        let token_balance = token.balanceOf(account);
        let decimals = token.decimals();
        let (token_balance, token_decimals) =
            tokio::try_join!(token_balance.call().into_future(), decimals.call().into_future())?;

        Ok(RawUserState {
            account,
            share_balance,
            requested_redemption_shares,
            asset,
            token_balance,
            token_decimals,
        })
    }

    pub async fn user_balances(&self, account: Address) -> Result<UserBalances, EvmError> {
        Ok(self.read_user_state(account).await?.into_balances())
    }

    /// Queue reads; `epoch` selects which epoch's requested total is read.
    pub async fn read_queue_state(&self, epoch: u64) -> Result<RawQueueState, EvmError> {
        let vault = self.vault();
        let current_epoch = vault.getCurrentEpoch();
        let requested = vault.totalRequestedRedemptionAmountPerEpoch(U256::from(epoch));
        let available = vault.getAvailableRedemptionAmount();
        let total_assets = vault.totalAssets();
        let total_supply = vault.totalSupply();

        let (current_epoch, requested_shares, available, total_assets, total_supply) = tokio::try_join!(
            current_epoch.call().into_future(),
            requested.call().into_future(),
            available.call().into_future(),
            total_assets.call().into_future(),
            total_supply.call().into_future(),
        )?;

        Ok(RawQueueState {
            current_epoch,
            requested_shares,
            available,
            total_assets,
            total_supply,
        })
    }

    pub async fn redemption_queue(&self, epoch: u64) -> Result<RedemptionQueue, EvmError> {
        self.read_queue_state(epoch).await?.into_queue(self.asset_decimals)
    }

    /// Underlying asset address with its symbol and decimals.
    ///
    /// Metadata read failures fall back to defaults; only the `asset()` read is fatal.
    pub async fn vault_info(&self) -> Result<VaultInfo, EvmError> {
        let asset = self.vault().asset().call().await?;
        let token = self.erc20(asset);
        let symbol = token.symbol();
        let decimals = token.decimals();
        let (symbol, decimals) =
            tokio::join!(symbol.call().into_future(), decimals.call().into_future());

        if let Err(e) = &symbol {
            warn!(asset = %asset, error = %e, "symbol() failed, using default");
        }
        if let Err(e) = &decimals {
            warn!(asset = %asset, error = %e, "decimals() failed, using default");
        }

        Ok(RawAssetInfo {
            asset,
            symbol: symbol.ok(),
            decimals: decimals.ok(),
        }
        .into_info())
    }

    /// Allowance `owner` granted the vault on the configured underlying token.
    pub async fn allowance(&self, owner: Address) -> Result<U256, EvmError> {
        Ok(self
            .erc20(self.token_address)
            .allowance(owner, self.vault_address)
            .call()
            .await?)
    }

    /// Token the vault charges bridge fees in.
    pub async fn fee_token(&self) -> Result<Address, EvmError> {
        Ok(self.vault().feeToken().call().await?)
    }

    /// Encode, sign and send `call`; returns once the node accepted it.
    pub async fn submit(&self, call: VaultCall) -> Result<TxHash, EvmError> {
        let writer = self.writer.clone().ok_or(EvmError::NoSigner)?;
        let name = call.name();
        let vault = IStPendle::new(self.vault_address, writer.clone());

        let pending = match call {
            VaultCall::Approve { spender, amount } => {
                IERC20::new(self.token_address, writer).approve(spender, amount).send().await
            }
            VaultCall::Deposit { amount, receiver } => vault.deposit(amount, receiver).send().await,
            VaultCall::DepositBeforeFirstEpoch { amount, receiver } => {
                vault.depositBeforeFirstEpoch(amount, receiver).send().await
            }
            VaultCall::RequestRedemption { shares, epoch } => {
                vault.requestRedemptionForEpoch(shares, epoch).send().await
            }
            VaultCall::ClaimRedemption { shares } => vault.claimAvailableRedemptionShares(shares).send().await,
            VaultCall::ClaimFees { total_accrued, proof } => vault.claimFees(total_accrued, proof).send().await,
            VaultCall::SetFeeReceiver { receiver } => vault.setFeeReceiver(receiver).send().await,
            VaultCall::SetLpFeeReceiver { receiver } => vault.setLpFeeReceiver(receiver).send().await,
            VaultCall::Vote { pools, weights } => vault.vote(pools, weights).send().await,
            VaultCall::Bridge {
                chain_selector,
                receiver,
                amount,
            } => vault.bridgeStPendle(chain_selector, receiver, amount).send().await,
        }
        .map_err(|e| {
            warn!(call = name, error = %e, "Transaction submission failed");
            EvmError::Submission(e.to_string())
        })?;

        let tx_hash = *pending.tx_hash();
        info!(call = name, tx_hash = %tx_hash, "Transaction submitted");
        Ok(tx_hash)
    }

    /// Poll for the receipt of `tx_hash` until mined or the timeout elapses.
    pub async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<ReceiptSummary, EvmError> {
        let started = Instant::now();
        loop {
            if let Some(receipt) = self.reader.get_transaction_receipt(tx_hash).await? {
                let summary = ReceiptSummary {
                    tx_hash,
                    block_number: receipt.block_number(),
                    gas_used: receipt.gas_used(),
                    success: receipt.status(),
                };
                info!(
                    tx_hash = %tx_hash,
                    block = ?summary.block_number,
                    success = summary.success,
                    "Transaction mined"
                );
                return Ok(summary);
            }

            if started.elapsed() >= self.receipt_timeout {
                return Err(EvmError::ReceiptTimeout {
                    tx_hash: tx_hash.to_string(),
                    waited_secs: started.elapsed().as_secs(),
                });
            }

            debug!(tx_hash = %tx_hash, "Receipt not yet available");
            tokio::time::sleep(self.receipt_poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VAULT: &str = "0x1111111111111111111111111111111111111111";
    const TOKEN: &str = "0x2222222222222222222222222222222222222222";
    // Anvil's first default account
    const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_builder_read_only() {
        let client = VaultClient::builder()
            .rpc_url("http://127.0.0.1:8545")
            .vault_address(VAULT)
            .token_address(TOKEN)
            .build()
            .unwrap();
        assert_eq!(client.vault_address(), parse_address(VAULT).unwrap());
        assert!(client.signer_address().is_none());
    }

    #[test]
    fn test_builder_with_signer() {
        let client = VaultClient::builder()
            .rpc_url("http://127.0.0.1:8545")
            .vault_address(VAULT)
            .token_address(TOKEN)
            .private_key(Some(ANVIL_KEY.to_string()))
            .build()
            .unwrap();
        assert_eq!(
            client.signer_address(),
            Some(parse_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap())
        );
    }

    #[test]
    fn test_builder_rejects_bad_input() {
        let err = VaultClient::builder()
            .rpc_url("not a url")
            .vault_address(VAULT)
            .token_address(TOKEN)
            .build()
            .unwrap_err();
        assert!(matches!(err, EvmError::InvalidRpcUrl(_)));

        let err = VaultClient::builder()
            .vault_address("0x1234")
            .token_address(TOKEN)
            .build()
            .unwrap_err();
        assert!(matches!(err, EvmError::InvalidAddress(_)));

        let err = VaultClient::builder()
            .vault_address(VAULT)
            .token_address(TOKEN)
            .private_key(Some("zz".to_string()))
            .build()
            .unwrap_err();
        assert!(matches!(err, EvmError::InvalidSigner(_)));
    }

    #[tokio::test]
    async fn test_submit_without_signer() {
        let client = VaultClient::builder()
            .vault_address(VAULT)
            .token_address(TOKEN)
            .build()
            .unwrap();
        let err = client
            .submit(VaultCall::ClaimRedemption { shares: U256::from(1u64) })
            .await
            .unwrap_err();
        assert!(matches!(err, EvmError::NoSigner));
    }

    #[tokio::test]
    #[ignore] // Requires a local anvil node with the vault deployed
    async fn test_read_vault_state_local() {
        let client = VaultClient::builder()
            .rpc_url("http://127.0.0.1:8545")
            .vault_address(VAULT)
            .token_address(TOKEN)
            .build()
            .unwrap();
        client.health_check(31337).await.unwrap();
        let metrics = client.vault_metrics().await.unwrap();
        assert!(metrics.total_supply >= 0.0);
    }
}
