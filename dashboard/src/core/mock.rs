//! In-memory service doubles for tasks and flows.

use crate::core::error::{AppError, Result};
use crate::core::service::{PriceService, VaultService};
use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use lib_core::dto::{RedemptionQueue, UserBalances, VaultInfo, VaultMetrics};
use lib_evm::{ReceiptSummary, VaultCall};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub(crate) const VAULT: Address = Address::repeat_byte(0x11);
pub(crate) const USER: Address = Address::repeat_byte(0xaa);

fn rpc_down() -> AppError {
    AppError::Chain(lib_core::AppError::Rpc("connection refused".to_string()))
}

pub(crate) fn sample_metrics() -> VaultMetrics {
    VaultMetrics {
        total_assets: 200.0,
        total_locked_pendle: 150.0,
        total_supply: 100.0,
        current_epoch: 3,
        epoch_duration: 604_800,
        current_epoch_start: 1_000,
        pre_lock_redemption_period: 100,
    }
}

pub(crate) fn sample_balances() -> UserBalances {
    UserBalances {
        account: USER.to_string(),
        share_balance: 10.0,
        token_balance: 50.0,
        share_balance_text: "10".to_string(),
        token_balance_text: "50".to_string(),
        requested_redemption_shares: 4.0,
        token_address: Address::repeat_byte(0x22).to_string(),
        token_decimals: 18,
    }
}

pub(crate) fn sample_queue() -> RedemptionQueue {
    RedemptionQueue {
        epoch: 3,
        shares_queued: 50.0,
        available: 40.0,
        total_assets: 200.0,
        total_supply: 100.0,
    }
}

/// How the mock answers `wait_for_receipt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReceiptMode {
    Success,
    Reverted,
    /// Never resolves
    Hang,
}

pub(crate) struct MockVault {
    pub signer: Option<Address>,
    pub reads_fail: Mutex<bool>,
    pub metrics: Mutex<VaultMetrics>,
    pub balances: Mutex<UserBalances>,
    pub queue: Mutex<RedemptionQueue>,
    pub allowance: Mutex<U256>,
    pub submit_error: Mutex<Option<String>>,
    pub receipt_mode: Mutex<ReceiptMode>,
    pub submitted: Mutex<Vec<VaultCall>>,
    pub queue_epochs: Mutex<Vec<u64>>,
    pub metric_reads: AtomicUsize,
}

impl Default for MockVault {
    fn default() -> Self {
        Self {
            signer: Some(USER),
            reads_fail: Mutex::new(false),
            metrics: Mutex::new(sample_metrics()),
            balances: Mutex::new(sample_balances()),
            queue: Mutex::new(sample_queue()),
            allowance: Mutex::new(U256::ZERO),
            submit_error: Mutex::new(None),
            receipt_mode: Mutex::new(ReceiptMode::Success),
            submitted: Mutex::new(Vec::new()),
            queue_epochs: Mutex::new(Vec::new()),
            metric_reads: AtomicUsize::new(0),
        }
    }
}

impl MockVault {
    pub fn submitted(&self) -> Vec<VaultCall> {
        self.submitted.lock().clone()
    }

    fn check_reads(&self) -> Result<()> {
        if *self.reads_fail.lock() {
            Err(rpc_down())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl VaultService for MockVault {
    fn vault_address(&self) -> Address {
        VAULT
    }

    fn signer_address(&self) -> Option<Address> {
        self.signer
    }

    async fn vault_metrics(&self) -> Result<VaultMetrics> {
        self.metric_reads.fetch_add(1, Ordering::SeqCst);
        self.check_reads()?;
        Ok(self.metrics.lock().clone())
    }

    async fn user_balances(&self, _account: Address) -> Result<UserBalances> {
        self.check_reads()?;
        Ok(self.balances.lock().clone())
    }

    async fn redemption_queue(&self, epoch: u64) -> Result<RedemptionQueue> {
        self.queue_epochs.lock().push(epoch);
        self.check_reads()?;
        Ok(self.queue.lock().clone())
    }

    async fn vault_info(&self) -> Result<VaultInfo> {
        self.check_reads()?;
        Ok(VaultInfo::with_defaults(Address::repeat_byte(0x22).to_string()))
    }

    async fn allowance(&self, _owner: Address) -> Result<U256> {
        self.check_reads()?;
        Ok(*self.allowance.lock())
    }

    async fn fee_token(&self) -> Result<Address> {
        self.check_reads()?;
        Ok(Address::repeat_byte(0x33))
    }

    async fn submit(&self, call: VaultCall) -> Result<TxHash> {
        if let Some(message) = self.submit_error.lock().clone() {
            return Err(AppError::Chain(lib_core::AppError::Transaction(message)));
        }
        if let VaultCall::Approve { amount, .. } = &call {
            *self.allowance.lock() = *amount;
        }
        self.submitted.lock().push(call);
        Ok(TxHash::repeat_byte(0xab))
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<ReceiptSummary> {
        let mode = *self.receipt_mode.lock();
        match mode {
            ReceiptMode::Hang => std::future::pending().await,
            ReceiptMode::Success | ReceiptMode::Reverted => Ok(ReceiptSummary {
                tx_hash,
                block_number: Some(42),
                gas_used: 21_000,
                success: mode == ReceiptMode::Success,
            }),
        }
    }
}

pub(crate) struct MockPrice {
    pub price: Mutex<Option<f64>>,
}

impl MockPrice {
    pub fn new(price: Option<f64>) -> Self {
        Self {
            price: Mutex::new(price),
        }
    }
}

#[async_trait]
impl PriceService for MockPrice {
    async fn spot_price(&self, _coin_id: &str) -> Result<f64> {
        self.price
            .lock()
            .ok_or_else(|| AppError::Chain(lib_core::AppError::Price("Price unavailable".to_string())))
    }
}
