//! # Application Events
//!
//! Event types for async task communication between background tasks and the consumer.

use crate::flows::TxStatus;
use lib_core::dto::{RedemptionQueue, UserBalances, VaultInfo, VaultMetrics};

/// Polling tasks, one per data concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    VaultMetrics,
    UserBalances,
    RedemptionQueue,
    Price,
    VaultInfo,
}

impl TaskKind {
    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::VaultMetrics => "vault_metrics",
            TaskKind::UserBalances => "user_balances",
            TaskKind::RedemptionQueue => "redemption_queue",
            TaskKind::Price => "price",
            TaskKind::VaultInfo => "vault_info",
        }
    }
}

/// Async task results sent to the consumer
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A poll cycle started; existing data is kept and flagged loading
    Fetching(TaskKind),
    /// Vault metrics poll completed
    VaultMetricsResult(Result<VaultMetrics, String>),
    /// User balances poll completed
    UserBalancesResult(Result<UserBalances, String>),
    /// Redemption queue poll completed
    RedemptionQueueResult(Result<RedemptionQueue, String>),
    /// Spot price poll completed
    PriceResult(Result<f64, String>),
    /// Asset info read completed
    VaultInfoResult(Result<VaultInfo, String>),
    /// A flow advanced its transaction state
    Transaction { flow: &'static str, status: TxStatus },
}
