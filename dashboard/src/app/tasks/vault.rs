//! # Vault Tasks
//!
//! Vault-wide reads: metrics, redemption queue, asset info and the spot price.

use super::{spawn_once, spawn_periodic, TaskContext};
use crate::app::events::{AppEvent, TaskKind};
use crate::core::service::{PriceService, VaultService};
use std::time::Instant;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Price reported when the feed is disabled.
pub(crate) const PINNED_SPOT_PRICE: f64 = 1.0;

pub async fn poll_vault_metrics(vault: &dyn VaultService) -> AppEvent {
    let start = Instant::now();
    let result = vault.vault_metrics().await;
    match &result {
        Ok(metrics) => debug!(
            epoch = metrics.current_epoch,
            nav = metrics.nav_per_share(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Vault metrics fetched"
        ),
        Err(e) => warn!(error = %e, "Failed to fetch vault metrics"),
    }
    AppEvent::VaultMetricsResult(result.map_err(|e| e.to_string()))
}

/// Queue state for `epoch`.
pub async fn poll_redemption_queue(vault: &dyn VaultService, epoch: u64) -> AppEvent {
    let result = vault.redemption_queue(epoch).await;
    match &result {
        Ok(queue) => debug!(
            epoch,
            shares_queued = queue.shares_queued,
            available = queue.available,
            "Redemption queue fetched"
        ),
        Err(e) => warn!(epoch, error = %e, "Failed to fetch redemption queue"),
    }
    AppEvent::RedemptionQueueResult(result.map_err(|e| e.to_string()))
}

pub async fn poll_vault_info(vault: &dyn VaultService) -> AppEvent {
    let result = vault.vault_info().await;
    if let Err(e) = &result {
        warn!(error = %e, "Failed to read vault asset info");
    }
    AppEvent::VaultInfoResult(result.map_err(|e| e.to_string()))
}

pub async fn poll_price(price: &dyn PriceService, coin_id: &str) -> AppEvent {
    let result = price.spot_price(coin_id).await;
    if let Err(e) = &result {
        warn!(coin_id, error = %e, "Failed to fetch spot price");
    }
    AppEvent::PriceResult(result.map_err(|e| e.detail().to_string()))
}

pub(crate) fn spawn_vault_metrics(ctx: TaskContext, cancel: CancellationToken) -> JoinHandle<()> {
    let interval = ctx.intervals.vault_metrics;
    let event_tx = ctx.event_tx.clone();
    spawn_periodic(TaskKind::VaultMetrics, interval, cancel, event_tx, move || {
        let vault = ctx.vault.clone();
        async move { poll_vault_metrics(vault.as_ref()).await }
    })
}

/// Reads the requested total for the epoch of the latest metrics, 0 before they load.
pub(crate) fn spawn_redemption_queue(ctx: TaskContext, cancel: CancellationToken) -> JoinHandle<()> {
    let interval = ctx.intervals.redemption_queue;
    let event_tx = ctx.event_tx.clone();
    spawn_periodic(TaskKind::RedemptionQueue, interval, cancel, event_tx, move || {
        let vault = ctx.vault.clone();
        let epoch = ctx.queue_epoch();
        async move { poll_redemption_queue(vault.as_ref(), epoch).await }
    })
}

pub(crate) fn spawn_vault_info(ctx: TaskContext, cancel: CancellationToken) -> JoinHandle<()> {
    let vault = ctx.vault.clone();
    spawn_once(TaskKind::VaultInfo, cancel, ctx.event_tx.clone(), async move {
        poll_vault_info(vault.as_ref()).await
    })
}

/// Periodic when the feed is enabled; otherwise reports the pinned price once.
pub(crate) fn spawn_price(ctx: TaskContext, cancel: CancellationToken) -> JoinHandle<()> {
    let event_tx = ctx.event_tx.clone();
    let feed_interval = ctx.intervals.price;
    match feed_interval {
        Some(interval) => spawn_periodic(TaskKind::Price, interval, cancel, event_tx, move || {
            let price = ctx.price.clone();
            let coin_id = ctx.coin_id.clone();
            async move { poll_price(price.as_ref(), &coin_id).await }
        }),
        None => {
            debug!("Price feed disabled; spot pinned");
            spawn_once(TaskKind::Price, cancel, event_tx, async {
                AppEvent::PriceResult(Ok(PINNED_SPOT_PRICE))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tasks::test_context;
    use crate::core::mock::{sample_metrics, MockPrice, MockVault};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_poll_failure_is_reported() {
        let vault = MockVault::default();
        *vault.reads_fail.lock() = true;
        match poll_vault_metrics(&vault).await {
            AppEvent::VaultMetricsResult(Err(message)) => assert!(message.contains("RPC error")),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_price_failure_keeps_feed_message() {
        let price = MockPrice::new(None);
        match poll_price(&price, "pendle").await {
            AppEvent::PriceResult(Err(message)) => assert_eq!(message, "Price unavailable"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_queue_reads_epoch_from_state() {
        let vault = Arc::new(MockVault::default());
        let (ctx, rx) = test_context(vault.clone(), Arc::new(MockPrice::new(Some(1.0))), None);
        ctx.state
            .write()
            .handle_event(AppEvent::VaultMetricsResult(Ok(sample_metrics())));

        let cancel = CancellationToken::new();
        let handle = spawn_redemption_queue(ctx, cancel.clone());
        assert!(matches!(rx.recv().await.unwrap(), AppEvent::Fetching(TaskKind::RedemptionQueue)));
        assert!(matches!(rx.recv().await.unwrap(), AppEvent::RedemptionQueueResult(Ok(_))));
        cancel.cancel();
        handle.await.unwrap();

        assert_eq!(vault.queue_epochs.lock()[0], 3);
    }

    #[tokio::test]
    async fn test_disabled_feed_reports_pinned_price_once() {
        let (mut ctx, rx) = test_context(
            Arc::new(MockVault::default()),
            Arc::new(MockPrice::new(None)),
            None,
        );
        ctx.intervals.price = None;

        let handle = spawn_price(ctx, CancellationToken::new());
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();

        let events: Vec<AppEvent> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], AppEvent::PriceResult(Ok(p)) if p == 1.0));
    }
}
