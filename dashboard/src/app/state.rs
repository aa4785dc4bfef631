//! # Application State Types
//!
//! Last-known results of every polling task plus the most recent transaction
//! status per flow. Shared as `Arc<RwLock<DashboardState>>`; writers hold the
//! lock only long enough to apply one event.

use crate::app::events::{AppEvent, TaskKind};
use crate::flows::TxStatus;
use alloy::primitives::Address;
use lib_core::dto::{RedemptionQueue, UserBalances, VaultInfo, VaultMetrics};
use lib_core::metrics::MarketSignals;
use lib_utils::now_unix;
use std::collections::BTreeMap;

/// Result of one polling concern.
///
/// A failed poll keeps the last successful `data`; only `error` changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Query<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    /// Unix seconds of the last successful poll
    pub updated_at: Option<u64>,
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            updated_at: None,
        }
    }
}

impl<T> Query<T> {
    pub fn begin(&mut self) {
        self.loading = true;
    }

    pub fn apply(&mut self, result: Result<T, String>) {
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
                self.updated_at = Some(now_unix());
            }
            Err(error) => self.error = Some(error),
        }
    }

    /// Loading with nothing to show yet.
    pub fn is_initial_load(&self) -> bool {
        self.loading && self.data.is_none()
    }
}

/// Dashboard-wide state
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// Account whose balances are shown
    pub account: Option<Address>,
    pub vault_metrics: Query<VaultMetrics>,
    pub user_balances: Query<UserBalances>,
    pub redemption_queue: Query<RedemptionQueue>,
    pub spot_price: Query<f64>,
    pub vault_info: Query<VaultInfo>,
    /// Latest status per flow name
    pub transactions: BTreeMap<&'static str, TxStatus>,
}

impl DashboardState {
    pub fn new(account: Option<Address>) -> Self {
        Self {
            account,
            ..Default::default()
        }
    }

    /// Apply one task result.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Fetching(kind) => match kind {
                TaskKind::VaultMetrics => self.vault_metrics.begin(),
                TaskKind::UserBalances => self.user_balances.begin(),
                TaskKind::RedemptionQueue => self.redemption_queue.begin(),
                TaskKind::Price => self.spot_price.begin(),
                TaskKind::VaultInfo => self.vault_info.begin(),
            },
            AppEvent::VaultMetricsResult(result) => self.vault_metrics.apply(result),
            AppEvent::UserBalancesResult(result) => self.user_balances.apply(result),
            AppEvent::RedemptionQueueResult(result) => self.redemption_queue.apply(result),
            AppEvent::PriceResult(result) => self.spot_price.apply(result),
            AppEvent::VaultInfoResult(result) => self.vault_info.apply(result),
            AppEvent::Transaction { flow, status } => {
                self.transactions.insert(flow, status);
            }
        }
    }

    /// Epoch the queue task reads, from the latest metrics (0 before the first load).
    pub fn queue_epoch(&self) -> u64 {
        self.vault_metrics
            .data
            .as_ref()
            .map(|m| m.current_epoch)
            .unwrap_or(0)
    }

    pub fn nav_per_share(&self) -> Option<f64> {
        self.vault_metrics.data.as_ref().map(VaultMetrics::nav_per_share)
    }

    /// Spot, NAV in USD and discount; `None` until both metrics and price are known.
    pub fn market_signals(&self) -> Option<MarketSignals> {
        let spot = self.spot_price.data?;
        self.vault_metrics.data.as_ref().map(|m| m.market_signals(spot))
    }

    /// Symbol of the underlying asset, `PENDLE` until asset info loads.
    pub fn asset_symbol(&self) -> &str {
        self.vault_info
            .data
            .as_ref()
            .map(|info| info.asset_symbol.as_str())
            .unwrap_or(VaultInfo::DEFAULT_SYMBOL)
    }
}
