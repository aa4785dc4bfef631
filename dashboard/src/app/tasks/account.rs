//! # Account Tasks
//!
//! Balances of the watched account.

use super::{spawn_periodic, TaskContext};
use crate::app::events::{AppEvent, TaskKind};
use crate::core::service::VaultService;
use alloy::primitives::Address;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub async fn poll_user_balances(vault: &dyn VaultService, account: Address) -> AppEvent {
    let result = vault.user_balances(account).await;
    match &result {
        Ok(balances) => debug!(
            account = %account,
            shares = balances.share_balance,
            tokens = balances.token_balance,
            "User balances fetched"
        ),
        Err(e) => warn!(account = %account, error = %e, "Failed to fetch user balances"),
    }
    AppEvent::UserBalancesResult(result.map_err(|e| e.to_string()))
}

/// Polls the account held in state at each tick; a cleared account yields an error result.
pub(crate) fn spawn_user_balances(ctx: TaskContext, cancel: CancellationToken) -> JoinHandle<()> {
    let interval = ctx.intervals.user_balances;
    let event_tx = ctx.event_tx.clone();
    spawn_periodic(TaskKind::UserBalances, interval, cancel, event_tx, move || {
        let vault = ctx.vault.clone();
        let account = ctx.account();
        async move {
            match account {
                Some(account) => poll_user_balances(vault.as_ref(), account).await,
                None => AppEvent::UserBalancesResult(Err("No account connected".to_string())),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tasks::test_context;
    use crate::core::mock::{sample_balances, MockPrice, MockVault, USER};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_balances_flow_into_state() {
        let (ctx, rx) = test_context(
            Arc::new(MockVault::default()),
            Arc::new(MockPrice::new(Some(1.0))),
            Some(USER),
        );
        let state = ctx.state.clone();
        let cancel = CancellationToken::new();
        let handle = spawn_user_balances(ctx, cancel.clone());

        for _ in 0..2 {
            let event = rx.recv().await.unwrap();
            state.write().handle_event(event);
        }
        cancel.cancel();
        handle.await.unwrap();

        assert_eq!(state.read().user_balances.data, Some(sample_balances()));
    }

    #[tokio::test]
    async fn test_failed_batch_keeps_previous_balances() {
        let vault = Arc::new(MockVault::default());
        let (ctx, rx) = test_context(vault.clone(), Arc::new(MockPrice::new(Some(1.0))), Some(USER));
        let state = ctx.state.clone();
        state
            .write()
            .handle_event(AppEvent::UserBalancesResult(Ok(sample_balances())));
        *vault.reads_fail.lock() = true;

        let cancel = CancellationToken::new();
        let handle = spawn_user_balances(ctx, cancel.clone());
        for _ in 0..2 {
            let event = rx.recv().await.unwrap();
            state.write().handle_event(event);
        }
        cancel.cancel();
        handle.await.unwrap();

        let state = state.read();
        assert_eq!(state.user_balances.data, Some(sample_balances()));
        assert!(state.user_balances.error.is_some());
    }
}
