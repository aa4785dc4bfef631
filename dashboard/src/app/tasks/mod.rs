//! # Polling Tasks
//!
//! One periodic tokio task per data concern. Every task owns a child of the
//! application's [`CancellationToken`], issues its read batch, and sends
//! [`AppEvent::Fetching`] followed by the result over the event channel.
//!
//! Tasks are independent: there is no ordering between them, so metrics and
//! balances may reflect different block heights.

pub mod account;
pub mod vault;

use crate::app::events::{AppEvent, TaskKind};
use crate::app::state::DashboardState;
use crate::core::service::{PriceService, VaultService};
use alloy::primitives::Address;
use async_channel::Sender;
use lib_core::PollIntervals;
use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Everything the pollers need, built once at startup.
#[derive(Clone)]
pub struct TaskContext {
    pub vault: Arc<dyn VaultService>,
    pub price: Arc<dyn PriceService>,
    /// Price feed asset id
    pub coin_id: String,
    pub intervals: PollIntervals,
    pub state: Arc<RwLock<DashboardState>>,
    pub event_tx: Sender<AppEvent>,
}

impl TaskContext {
    fn account(&self) -> Option<Address> {
        self.state.read().account
    }

    fn queue_epoch(&self) -> u64 {
        self.state.read().queue_epoch()
    }
}

/// Running pollers and the token that stops them.
#[derive(Debug)]
pub struct PollerSet {
    cancel: CancellationToken,
    handles: Vec<(TaskKind, JoinHandle<()>)>,
}

impl PollerSet {
    /// Spawn every poller under a child of `parent`.
    pub fn spawn(ctx: &TaskContext, parent: &CancellationToken) -> Self {
        let cancel = parent.child_token();
        let mut handles = vec![
            (TaskKind::VaultInfo, vault::spawn_vault_info(ctx.clone(), cancel.child_token())),
            (
                TaskKind::VaultMetrics,
                vault::spawn_vault_metrics(ctx.clone(), cancel.child_token()),
            ),
            (
                TaskKind::RedemptionQueue,
                vault::spawn_redemption_queue(ctx.clone(), cancel.child_token()),
            ),
            (TaskKind::Price, vault::spawn_price(ctx.clone(), cancel.child_token())),
        ];

        if ctx.account().is_some() {
            handles.push((
                TaskKind::UserBalances,
                account::spawn_user_balances(ctx.clone(), cancel.child_token()),
            ));
        } else {
            debug!("No account configured; balance polling disabled");
        }

        info!(tasks = handles.len(), "Pollers started");
        Self { cancel, handles }
    }

    pub fn kinds(&self) -> Vec<TaskKind> {
        self.handles.iter().map(|(kind, _)| *kind).collect()
    }

    /// Cancel every poller and wait for them to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        for (kind, handle) in self.handles {
            if let Err(e) = handle.await {
                tracing::warn!(task = kind.name(), error = %e, "Poller exited abnormally");
            }
        }
        info!("Pollers stopped");
    }
}

/// Run `poll` every `interval` until `cancel` fires or the consumer goes away.
///
/// The first poll runs immediately. A poll in flight is abandoned on cancellation.
pub(crate) fn spawn_periodic<F, Fut>(
    kind: TaskKind,
    interval: Duration,
    cancel: CancellationToken,
    event_tx: Sender<AppEvent>,
    mut poll: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = AppEvent> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            task = kind.name(),
            interval_ms = interval.as_millis() as u64,
            "Poller started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            if event_tx.send(AppEvent::Fetching(kind)).await.is_err() {
                break;
            }

            let event = tokio::select! {
                _ = cancel.cancelled() => break,
                event = poll() => event,
            };

            if event_tx.send(event).await.is_err() {
                break;
            }
        }

        debug!(task = kind.name(), "Poller stopped");
    })
}

/// Run `poll` once, unless cancelled first.
pub(crate) fn spawn_once<Fut>(
    kind: TaskKind,
    cancel: CancellationToken,
    event_tx: Sender<AppEvent>,
    poll: Fut,
) -> JoinHandle<()>
where
    Fut: Future<Output = AppEvent> + Send + 'static,
{
    tokio::spawn(async move {
        if event_tx.send(AppEvent::Fetching(kind)).await.is_err() {
            return;
        }
        let event = tokio::select! {
            _ = cancel.cancelled() => return,
            event = poll => event,
        };
        let _ = event_tx.send(event).await;
        debug!(task = kind.name(), "One-shot read finished");
    })
}

#[cfg(test)]
pub(crate) fn test_context(
    vault: Arc<dyn VaultService>,
    price: Arc<dyn PriceService>,
    account: Option<Address>,
) -> (TaskContext, async_channel::Receiver<AppEvent>) {
    let (event_tx, event_rx) = async_channel::unbounded();
    let tick = Duration::from_millis(10);
    let ctx = TaskContext {
        vault,
        price,
        coin_id: "pendle".to_string(),
        intervals: PollIntervals {
            vault_metrics: tick,
            user_balances: tick,
            redemption_queue: tick,
            price: Some(tick),
            receipt: tick,
        },
        state: Arc::new(RwLock::new(DashboardState::new(account))),
        event_tx,
    };
    (ctx, event_rx)
}
