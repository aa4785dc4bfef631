//! # Application Orchestrator
//!
//! [`DashboardApp`] owns the shared state and the event channel, starts the
//! pollers, and applies their results.
//!
//! ```text
//! ┌──────────────────────────┐   async_channel    ┌──────────────────────────┐
//! │  Pollers (tokio tasks)   │ ─────────────────► │  DashboardApp            │
//! │  - vault metrics         │     AppEvent       │  - handle_event()        │
//! │  - user balances         │                    │  - cards()               │
//! │  - redemption queue      │                    └────────────┬─────────────┘
//! │  - spot price            │                                 │
//! │  - asset info (once)     │                    ┌────────────▼─────────────┐
//! └──────────────────────────┘                    │ Arc<RwLock<DashboardState>>│
//!              ▲                                  └──────────────────────────┘
//!              │ CancellationToken (child of the app token)
//! ```
//!
//! Flows publish their transaction status on the same channel, so one consumer
//! loop sees both poll results and transaction progress.

pub mod events;
pub mod state;
pub mod tasks;
pub mod view;

use crate::core::service::{PriceService, VaultService};
use crate::flows::FlowContext;
use alloy::primitives::Address;
use async_channel::{unbounded, Receiver, Sender};
use events::AppEvent;
use lib_core::PollIntervals;
use lib_utils::now_unix;
use parking_lot::RwLock;
use state::DashboardState;
use std::sync::Arc;
use tasks::{PollerSet, TaskContext};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use view::CardGroup;

pub struct DashboardApp {
    pub state: Arc<RwLock<DashboardState>>,
    event_tx: Sender<AppEvent>,
    event_rx: Receiver<AppEvent>,
    vault: Arc<dyn VaultService>,
    price: Arc<dyn PriceService>,
    coin_id: String,
    intervals: PollIntervals,
}

impl DashboardApp {
    /// `account` selects whose balances are shown; `None` polls vault data only.
    pub fn new(
        vault: Arc<dyn VaultService>,
        price: Arc<dyn PriceService>,
        coin_id: impl Into<String>,
        intervals: PollIntervals,
        account: Option<Address>,
    ) -> Self {
        let (event_tx, event_rx) = unbounded();
        Self {
            state: Arc::new(RwLock::new(DashboardState::new(account))),
            event_tx,
            event_rx,
            vault,
            price,
            coin_id: coin_id.into(),
            intervals,
        }
    }

    /// Sender for flows to publish transaction status on.
    pub fn event_tx(&self) -> Sender<AppEvent> {
        self.event_tx.clone()
    }

    pub fn vault(&self) -> Arc<dyn VaultService> {
        self.vault.clone()
    }

    pub fn task_context(&self) -> TaskContext {
        TaskContext {
            vault: self.vault.clone(),
            price: self.price.clone(),
            coin_id: self.coin_id.clone(),
            intervals: self.intervals.clone(),
            state: self.state.clone(),
            event_tx: self.event_tx.clone(),
        }
    }

    /// Spawn every poller; they stop when `cancel` (or the returned set) is cancelled.
    pub fn start_polling(&self, cancel: &CancellationToken) -> PollerSet {
        PollerSet::spawn(&self.task_context(), cancel)
    }

    pub fn handle_event(&self, event: AppEvent) {
        if let AppEvent::Transaction { flow, status } = &event {
            debug!(flow, status = %status.label(), "Transaction status");
        }
        self.state.write().handle_event(event);
    }

    /// Apply every queued event without waiting. Returns how many were applied.
    pub fn on_tick(&self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next event and apply it.
    ///
    /// Returns `true` when the event carried a result worth re-rendering, and
    /// `None` once cancelled.
    pub async fn next_event(&self, cancel: &CancellationToken) -> Option<bool> {
        let event = tokio::select! {
            _ = cancel.cancelled() => return None,
            event = self.event_rx.recv() => event.ok()?,
        };
        let is_update = !matches!(event, AppEvent::Fetching(_));
        self.handle_event(event);
        Some(is_update)
    }

    /// One read of every concern, applied directly to state.
    ///
    /// Metrics are read first so the queue uses the current epoch.
    pub async fn refresh_once(&self) {
        let vault = self.vault.as_ref();
        let (info, metrics) = tokio::join!(
            tasks::vault::poll_vault_info(vault),
            tasks::vault::poll_vault_metrics(vault),
        );
        self.handle_event(info);
        self.handle_event(metrics);

        let epoch = self.state.read().queue_epoch();
        let account = self.state.read().account;
        let balances = async {
            match account {
                Some(account) => Some(tasks::account::poll_user_balances(vault, account).await),
                None => None,
            }
        };
        let price = async {
            if self.intervals.price.is_some() {
                tasks::vault::poll_price(self.price.as_ref(), &self.coin_id).await
            } else {
                AppEvent::PriceResult(Ok(tasks::vault::PINNED_SPOT_PRICE))
            }
        };

        let (queue, balances, price) = tokio::join!(
            tasks::vault::poll_redemption_queue(vault, epoch),
            balances,
            price,
        );
        self.handle_event(queue);
        if let Some(balances) = balances {
            self.handle_event(balances);
        }
        self.handle_event(price);
    }

    /// Snapshot for validating a flow against the latest poll.
    pub fn flow_context(&self) -> FlowContext {
        FlowContext::from_state(&self.state.read())
    }

    pub fn cards(&self) -> Vec<CardGroup> {
        view::build_cards(&self.state.read(), now_unix())
    }

    pub fn render(&self) -> String {
        view::render_text(&self.cards())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mock::{sample_balances, MockPrice, MockVault, USER};
    use crate::flows::{ClaimRedemptionFlow, TxStatus};
    use lib_core::NetworkKind;
    use std::time::Duration;

    fn app(account: Option<Address>) -> (DashboardApp, Arc<MockVault>) {
        let vault = Arc::new(MockVault::default());
        let app = DashboardApp::new(
            vault.clone(),
            Arc::new(MockPrice::new(Some(1.8))),
            "pendle",
            PollIntervals::for_network(NetworkKind::Remote),
            account,
        );
        (app, vault)
    }

    #[tokio::test]
    async fn test_refresh_once_fills_state() {
        let (app, vault) = app(Some(USER));
        app.refresh_once().await;

        let state = app.state.read();
        assert_eq!(state.user_balances.data, Some(sample_balances()));
        assert_eq!(state.spot_price.data, Some(1.8));
        assert!(state.vault_info.data.is_some());
        assert_eq!(vault.queue_epochs.lock().as_slice(), &[3]);
    }

    #[tokio::test]
    async fn test_refresh_once_local_pins_price() {
        let vault = Arc::new(MockVault::default());
        let app = DashboardApp::new(
            vault,
            Arc::new(MockPrice::new(None)),
            "pendle",
            PollIntervals::for_network(NetworkKind::Local),
            None,
        );
        app.refresh_once().await;
        assert_eq!(app.state.read().spot_price.data, Some(1.0));
        assert!(app.state.read().user_balances.data.is_none());
    }

    #[tokio::test]
    async fn test_read_failure_is_scoped_to_cards() {
        let (app, vault) = app(Some(USER));
        *vault.reads_fail.lock() = true;
        app.refresh_once().await;

        let state = app.state.read();
        assert!(state.vault_metrics.error.is_some());
        assert!(state.redemption_queue.error.is_some());
        assert_eq!(state.spot_price.data, Some(1.8));
        drop(state);
        assert!(app.render().contains("--"));
    }

    #[tokio::test]
    async fn test_flow_status_reaches_state() {
        let (app, vault) = app(Some(USER));
        app.refresh_once().await;

        let mut ctx = app.flow_context();
        ctx.now = 1_050;
        let mut flow = ClaimRedemptionFlow::new().with_events(app.event_tx());
        flow.shares = "1".into();
        flow.submit(vault.as_ref(), &ctx).await.unwrap();

        assert_eq!(app.on_tick(), 3);
        assert!(matches!(
            app.state.read().transactions.get("claim_redemption"),
            Some(TxStatus::Succeeded { .. })
        ));
    }

    #[tokio::test]
    async fn test_next_event_returns_none_when_cancelled() {
        let (app, _vault) = app(None);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = tokio::time::timeout(Duration::from_secs(1), app.next_event(&cancel)).await;
        assert_eq!(result.unwrap(), None);
    }
}
