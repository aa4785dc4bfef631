//! # Transaction Flows
//!
//! One flow per write action. Each flow validates its form locally, submits a
//! [`VaultCall`] through a [`VaultService`] and tracks the transaction through
//! `idle -> pending -> confirming -> settled`.
//!
//! Flows are driven with `&mut self`; a tracker that is still pending or
//! confirming rejects another submission with [`FlowError::Busy`].

pub mod bridge;
pub mod deposit;
pub mod fees;
pub mod governance;
pub mod withdraw;

pub use bridge::BridgeFlow;
pub use deposit::{DepositAction, DepositFlow};
pub use fees::FeeClaimFlow;
pub use governance::{ReceiverFlow, ReceiverKind, VoteEntry, VoteFlow};
pub use withdraw::{ClaimRedemptionFlow, RequestRedemptionFlow};

use crate::app::events::AppEvent;
use crate::app::state::DashboardState;
use crate::core::service::VaultService;
use alloy::primitives::{Address, TxHash, U256};
use async_channel::Sender;
use lib_core::dto::{UserBalances, VaultMetrics};
use lib_evm::client::parse_address;
use lib_evm::{parse_amount, ReceiptSummary, VaultCall};
use lib_utils::{now_unix, truncate_message, validate_address_format, validate_positive_amount};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Error message budget for deposit, redemption and claim flows.
pub const SHORT_MESSAGE_BUDGET: usize = 100;
/// Error message budget for bridge, fee and governance flows.
pub const LONG_MESSAGE_BUDGET: usize = 150;

/// Transaction lifecycle of one flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TxStatus {
    #[default]
    Idle,
    /// Signed and handed to the node
    Pending,
    /// Hash known, waiting for the receipt
    Confirming { tx_hash: TxHash },
    Succeeded {
        tx_hash: TxHash,
        block_number: Option<u64>,
    },
    /// Truncated error or revert message
    Failed { message: String },
}

impl TxStatus {
    pub fn is_busy(&self) -> bool {
        matches!(self, TxStatus::Pending | TxStatus::Confirming { .. })
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, TxStatus::Succeeded { .. } | TxStatus::Failed { .. })
    }

    pub fn label(&self) -> String {
        match self {
            TxStatus::Idle => "Idle".to_string(),
            TxStatus::Pending => "Waiting for signature...".to_string(),
            TxStatus::Confirming { tx_hash } => format!("Confirming {}", tx_hash),
            TxStatus::Succeeded { tx_hash, .. } => format!("Confirmed {}", tx_hash),
            TxStatus::Failed { message } => message.clone(),
        }
    }
}

/// Flow submission error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlowError {
    /// Form is incomplete or locally invalid; nothing was sent.
    #[error("{0}")]
    Invalid(String),

    #[error("A transaction is already in progress")]
    Busy,

    /// Submission, receipt or revert failure (truncated).
    #[error("{0}")]
    Failed(String),
}

/// Read-only snapshot of the state a flow validates against.
#[derive(Debug, Clone, Default)]
pub struct FlowContext {
    pub account: Option<Address>,
    pub balances: Option<UserBalances>,
    pub metrics: Option<VaultMetrics>,
    /// Unix seconds
    pub now: u64,
}

impl FlowContext {
    pub fn from_state(state: &DashboardState) -> Self {
        Self {
            account: state.account,
            balances: state.user_balances.data.clone(),
            metrics: state.vault_metrics.data.clone(),
            now: now_unix(),
        }
    }

    pub fn account(&self) -> Result<Address, FlowError> {
        self.account
            .ok_or_else(|| FlowError::Invalid("Connect a wallet first".to_string()))
    }

    pub fn nav_per_share(&self) -> f64 {
        self.metrics.as_ref().map(VaultMetrics::nav_per_share).unwrap_or(0.0)
    }
}

/// Drives one transaction at a time and publishes every status change.
#[derive(Debug)]
pub struct TxTracker {
    flow: &'static str,
    status: TxStatus,
    message_budget: usize,
    events: Option<Sender<AppEvent>>,
}

impl TxTracker {
    pub fn new(flow: &'static str, message_budget: usize) -> Self {
        Self {
            flow,
            status: TxStatus::Idle,
            message_budget,
            events: None,
        }
    }

    pub fn with_events(mut self, events: Sender<AppEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn flow(&self) -> &'static str {
        self.flow
    }

    pub fn status(&self) -> &TxStatus {
        &self.status
    }

    /// Back to idle once the result has been seen. Has no effect while busy.
    pub fn reset(&mut self) {
        if !self.status.is_busy() {
            self.status = TxStatus::Idle;
        }
    }

    /// Submit `call` and wait for its receipt.
    pub async fn run(
        &mut self,
        service: &dyn VaultService,
        call: VaultCall,
    ) -> Result<ReceiptSummary, FlowError> {
        if self.status.is_busy() {
            return Err(FlowError::Busy);
        }

        let trace_id = Uuid::new_v4();
        let function = call.name();
        info!(flow = self.flow, function, trace_id = %trace_id, "Submitting transaction");
        self.set_status(TxStatus::Pending).await;

        let tx_hash = match service.submit(call).await {
            Ok(hash) => hash,
            Err(e) => return Err(self.fail(e.detail(), trace_id).await),
        };

        info!(flow = self.flow, tx_hash = %tx_hash, trace_id = %trace_id, "Transaction sent");
        self.set_status(TxStatus::Confirming { tx_hash }).await;

        match service.wait_for_receipt(tx_hash).await {
            Ok(receipt) if receipt.success => {
                info!(
                    flow = self.flow,
                    tx_hash = %tx_hash,
                    block_number = ?receipt.block_number,
                    gas_used = receipt.gas_used,
                    trace_id = %trace_id,
                    "Transaction confirmed"
                );
                self.set_status(TxStatus::Succeeded {
                    tx_hash,
                    block_number: receipt.block_number,
                })
                .await;
                Ok(receipt)
            }
            Ok(_) => {
                let message = format!("Transaction reverted: {}", tx_hash);
                Err(self.fail(&message, trace_id).await)
            }
            Err(e) => Err(self.fail(e.detail(), trace_id).await),
        }
    }

    async fn fail(&mut self, message: &str, trace_id: Uuid) -> FlowError {
        let message = truncate_message(message, self.message_budget);
        warn!(flow = self.flow, error = %message, trace_id = %trace_id, "Transaction failed");
        self.set_status(TxStatus::Failed {
            message: message.clone(),
        })
        .await;
        FlowError::Failed(message)
    }

    async fn set_status(&mut self, status: TxStatus) {
        self.status = status;
        if let Some(events) = &self.events {
            let _ = events
                .send(AppEvent::Transaction {
                    flow: self.flow,
                    status: self.status.clone(),
                })
                .await;
        }
    }
}

/// Parse a positive amount field, bounded by `max` when it is known.
pub(crate) fn parse_positive_amount(
    text: &str,
    decimals: u8,
    max: Option<f64>,
    field: &str,
) -> Result<(U256, f64), FlowError> {
    let text = text.trim();
    let value: f64 = text
        .parse()
        .map_err(|_| FlowError::Invalid(format!("{} must be a number", field)))?;
    validate_positive_amount(value, max, field).map_err(FlowError::Invalid)?;

    let raw = parse_amount(text, decimals);
    if raw.is_zero() {
        return Err(FlowError::Invalid(format!("{} must be greater than 0", field)));
    }
    Ok((raw, value))
}

/// Receiver field; empty means the connected account.
pub(crate) fn resolve_receiver(text: &str, ctx: &FlowContext) -> Result<Address, FlowError> {
    let text = text.trim();
    if text.is_empty() {
        return ctx.account();
    }
    parse_address_field(text)
}

pub(crate) fn parse_address_field(text: &str) -> Result<Address, FlowError> {
    validate_address_format(text).map_err(FlowError::Invalid)?;
    parse_address(text.trim()).map_err(|e| FlowError::Invalid(e.to_string()))
}

#[cfg(test)]
pub(crate) fn test_context() -> FlowContext {
    use crate::core::mock::{sample_balances, sample_metrics, USER};

    FlowContext {
        account: Some(USER),
        balances: Some(sample_balances()),
        metrics: Some(sample_metrics()),
        now: 1_050,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mock::{MockVault, ReceiptMode};
    use std::time::Duration;

    fn claim() -> VaultCall {
        VaultCall::ClaimRedemption {
            shares: U256::from(1u64),
        }
    }

    #[tokio::test]
    async fn test_tracker_success_path_publishes_statuses() {
        let vault = MockVault::default();
        let (tx, rx) = async_channel::unbounded();
        let mut tracker = TxTracker::new("claim", SHORT_MESSAGE_BUDGET).with_events(tx);

        let receipt = tracker.run(&vault, claim()).await.unwrap();
        assert!(receipt.success);
        assert_eq!(
            tracker.status(),
            &TxStatus::Succeeded {
                tx_hash: TxHash::repeat_byte(0xab),
                block_number: Some(42)
            }
        );

        let mut seen = Vec::new();
        while let Ok(AppEvent::Transaction { status, .. }) = rx.try_recv() {
            seen.push(status);
        }
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], TxStatus::Pending);
        assert!(matches!(seen[1], TxStatus::Confirming { .. }));
        assert!(seen[2].is_settled());
    }

    #[tokio::test]
    async fn test_tracker_revert_is_failure() {
        let vault = MockVault::default();
        *vault.receipt_mode.lock() = ReceiptMode::Reverted;
        let mut tracker = TxTracker::new("claim", SHORT_MESSAGE_BUDGET);

        let err = tracker.run(&vault, claim()).await.unwrap_err();
        assert!(matches!(err, FlowError::Failed(ref m) if m.starts_with("Transaction reverted")));
        assert!(matches!(tracker.status(), TxStatus::Failed { .. }));
    }

    #[tokio::test]
    async fn test_tracker_truncates_error_message() {
        let vault = MockVault::default();
        *vault.submit_error.lock() = Some("x".repeat(400));
        let mut tracker = TxTracker::new("bridge", LONG_MESSAGE_BUDGET);

        let err = tracker.run(&vault, claim()).await.unwrap_err();
        let FlowError::Failed(message) = err else {
            panic!("expected failure");
        };
        assert_eq!(message.chars().count(), LONG_MESSAGE_BUDGET);
    }

    #[tokio::test]
    async fn test_tracker_rejects_second_submit_while_busy() {
        let vault = MockVault::default();
        *vault.receipt_mode.lock() = ReceiptMode::Hang;
        let mut tracker = TxTracker::new("claim", SHORT_MESSAGE_BUDGET);

        let pending = tokio::time::timeout(Duration::from_millis(50), tracker.run(&vault, claim())).await;
        assert!(pending.is_err());
        assert!(tracker.status().is_busy());

        assert_eq!(tracker.run(&vault, claim()).await.unwrap_err(), FlowError::Busy);
        assert_eq!(vault.submitted().len(), 1);

        tracker.reset();
        assert!(tracker.status().is_busy());
    }

    #[test]
    fn test_receiver_defaults_to_account() {
        let ctx = test_context();
        assert_eq!(resolve_receiver("  ", &ctx).unwrap(), ctx.account.unwrap());
        assert!(resolve_receiver("0x1234", &ctx).is_err());

        let no_wallet = FlowContext::default();
        assert!(resolve_receiver("", &no_wallet).is_err());
    }

    #[test]
    fn test_parse_positive_amount() {
        let (raw, value) = parse_positive_amount("1.5", 18, Some(10.0), "Amount").unwrap();
        assert_eq!(raw, U256::from(1_500_000_000_000_000_000u128));
        assert_eq!(value, 1.5);

        assert!(parse_positive_amount("0", 18, None, "Amount").is_err());
        assert!(parse_positive_amount("abc", 18, None, "Amount").is_err());
        assert!(parse_positive_amount("11", 18, Some(10.0), "Amount").is_err());
    }
}
