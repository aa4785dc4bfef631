//! # Redemption Flows
//!
//! Queue shares for redemption in an epoch, and claim redeemable shares while
//! the redemption window is open.

use super::{parse_positive_amount, FlowContext, FlowError, TxStatus, TxTracker, SHORT_MESSAGE_BUDGET};
use crate::app::events::AppEvent;
use crate::core::service::VaultService;
use alloy::primitives::U256;
use async_channel::Sender;
use lib_core::dto::SHARE_DECIMALS;
use lib_core::metrics::preview_redemption_assets;
use lib_evm::{ReceiptSummary, VaultCall};

#[derive(Debug)]
pub struct RequestRedemptionFlow {
    pub shares: String,
    /// Target epoch; empty lets the contract pick the next one
    pub epoch: String,
    tracker: TxTracker,
}

impl Default for RequestRedemptionFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestRedemptionFlow {
    pub fn new() -> Self {
        Self {
            shares: String::new(),
            epoch: String::new(),
            tracker: TxTracker::new("request_redemption", SHORT_MESSAGE_BUDGET),
        }
    }

    pub fn with_events(mut self, events: Sender<AppEvent>) -> Self {
        self.tracker = self.tracker.with_events(events);
        self
    }

    pub fn status(&self) -> &TxStatus {
        self.tracker.status()
    }

    pub fn validate(&self, ctx: &FlowContext) -> Result<(U256, f64, U256), FlowError> {
        ctx.account()?;
        let balance = ctx.balances.as_ref().map(|b| b.share_balance);
        let (shares, value) = parse_positive_amount(&self.shares, SHARE_DECIMALS, balance, "Shares")?;

        let epoch = self.epoch.trim();
        let epoch = if epoch.is_empty() {
            0
        } else {
            epoch
                .parse::<u64>()
                .map_err(|_| FlowError::Invalid("Epoch must be a whole number".to_string()))?
        };
        Ok((shares, value, U256::from(epoch)))
    }

    pub fn can_submit(&self, ctx: &FlowContext) -> bool {
        !self.tracker.status().is_busy() && self.validate(ctx).is_ok()
    }

    /// Underlying received at the current NAV.
    pub fn preview_assets(&self, ctx: &FlowContext) -> Option<f64> {
        let (_, value, _) = self.validate(ctx).ok()?;
        Some(preview_redemption_assets(value, ctx.nav_per_share()))
    }

    pub async fn submit(
        &mut self,
        service: &dyn VaultService,
        ctx: &FlowContext,
    ) -> Result<ReceiptSummary, FlowError> {
        let (shares, _, epoch) = self.validate(ctx)?;
        let receipt = self
            .tracker
            .run(service, VaultCall::RequestRedemption { shares, epoch })
            .await?;
        self.shares.clear();
        self.epoch.clear();
        Ok(receipt)
    }
}

#[derive(Debug)]
pub struct ClaimRedemptionFlow {
    pub shares: String,
    tracker: TxTracker,
}

impl Default for ClaimRedemptionFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimRedemptionFlow {
    pub fn new() -> Self {
        Self {
            shares: String::new(),
            tracker: TxTracker::new("claim_redemption", SHORT_MESSAGE_BUDGET),
        }
    }

    pub fn with_events(mut self, events: Sender<AppEvent>) -> Self {
        self.tracker = self.tracker.with_events(events);
        self
    }

    pub fn status(&self) -> &TxStatus {
        self.tracker.status()
    }

    pub fn validate(&self, ctx: &FlowContext) -> Result<U256, FlowError> {
        ctx.account()?;
        let window_open = ctx
            .metrics
            .as_ref()
            .map(|m| m.is_window_open(ctx.now))
            .unwrap_or(false);
        if !window_open {
            return Err(FlowError::Invalid("Redemption window is closed".to_string()));
        }

        let requested = ctx.balances.as_ref().map(|b| b.requested_redemption_shares);
        let (shares, _) = parse_positive_amount(&self.shares, SHARE_DECIMALS, requested, "Shares")?;
        Ok(shares)
    }

    pub fn can_submit(&self, ctx: &FlowContext) -> bool {
        !self.tracker.status().is_busy() && self.validate(ctx).is_ok()
    }

    pub async fn submit(
        &mut self,
        service: &dyn VaultService,
        ctx: &FlowContext,
    ) -> Result<ReceiptSummary, FlowError> {
        let shares = self.validate(ctx)?;
        let receipt = self
            .tracker
            .run(service, VaultCall::ClaimRedemption { shares })
            .await?;
        self.shares.clear();
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mock::MockVault;
    use crate::flows::test_context;

    #[test]
    fn test_request_bounds_and_epoch() {
        let ctx = test_context();
        let mut flow = RequestRedemptionFlow::new();
        flow.shares = "11".into();
        assert!(!flow.can_submit(&ctx), "above the share balance");

        flow.shares = "3".into();
        let (_, _, epoch) = flow.validate(&ctx).unwrap();
        assert_eq!(epoch, U256::ZERO);

        flow.epoch = "5".into();
        assert_eq!(flow.validate(&ctx).unwrap().2, U256::from(5u64));

        flow.epoch = "next".into();
        assert!(flow.validate(&ctx).is_err());
    }

    #[test]
    fn test_request_preview() {
        let ctx = test_context();
        let mut flow = RequestRedemptionFlow::new();
        flow.shares = "3".into();
        assert_eq!(flow.preview_assets(&ctx), Some(6.0));
    }

    #[tokio::test]
    async fn test_request_submits_and_clears() {
        let vault = MockVault::default();
        let ctx = test_context();
        let mut flow = RequestRedemptionFlow::new();
        flow.shares = "2".into();
        flow.epoch = "4".into();

        flow.submit(&vault, &ctx).await.unwrap();
        assert_eq!(
            vault.submitted(),
            vec![VaultCall::RequestRedemption {
                shares: U256::from(2_000_000_000_000_000_000u128),
                epoch: U256::from(4u64)
            }]
        );
        assert!(flow.shares.is_empty());
        assert!(flow.epoch.is_empty());
    }

    #[test]
    fn test_claim_requires_open_window() {
        let mut ctx = test_context();
        let mut flow = ClaimRedemptionFlow::new();
        flow.shares = "4".into();
        assert!(flow.can_submit(&ctx));

        flow.shares = "5".into();
        assert!(!flow.can_submit(&ctx), "above the requested shares");

        flow.shares = "4".into();
        ctx.now = 1_100;
        assert_eq!(
            flow.validate(&ctx).unwrap_err(),
            FlowError::Invalid("Redemption window is closed".to_string())
        );
    }

    #[tokio::test]
    async fn test_claim_submits() {
        let vault = MockVault::default();
        let ctx = test_context();
        let mut flow = ClaimRedemptionFlow::new();
        flow.shares = "1".into();

        flow.submit(&vault, &ctx).await.unwrap();
        assert!(matches!(vault.submitted()[0], VaultCall::ClaimRedemption { .. }));
    }
}
