//! # Deposit Flow
//!
//! Deposit the underlying token for vault shares. When the current allowance
//! is below the requested amount the approval is offered first.

use super::{
    parse_positive_amount, resolve_receiver, FlowContext, FlowError, TxStatus, TxTracker,
    SHORT_MESSAGE_BUDGET,
};
use crate::app::events::AppEvent;
use crate::core::service::VaultService;
use alloy::primitives::{Address, U256};
use async_channel::Sender;
use lib_core::dto::VaultInfo;
use lib_core::metrics::preview_deposit_shares;
use lib_evm::{ReceiptSummary, VaultCall};
use tracing::debug;

/// Next write the deposit form offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositAction {
    Approve,
    Deposit,
}

/// Approval first whenever the allowance does not cover the amount.
pub fn next_action(allowance: U256, amount: U256) -> DepositAction {
    if allowance < amount {
        DepositAction::Approve
    } else {
        DepositAction::Deposit
    }
}

#[derive(Debug)]
pub struct DepositFlow {
    /// Underlying amount in token units
    pub amount: String,
    /// Empty means the connected account
    pub receiver: String,
    allowance: Option<U256>,
    tracker: TxTracker,
}

impl Default for DepositFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl DepositFlow {
    pub fn new() -> Self {
        Self {
            amount: String::new(),
            receiver: String::new(),
            allowance: None,
            tracker: TxTracker::new("deposit", SHORT_MESSAGE_BUDGET),
        }
    }

    pub fn with_events(mut self, events: Sender<AppEvent>) -> Self {
        self.tracker = self.tracker.with_events(events);
        self
    }

    pub fn status(&self) -> &TxStatus {
        self.tracker.status()
    }

    pub fn allowance(&self) -> Option<U256> {
        self.allowance
    }

    fn token_decimals(ctx: &FlowContext) -> u8 {
        ctx.balances
            .as_ref()
            .map(|b| b.token_decimals)
            .unwrap_or(VaultInfo::DEFAULT_DECIMALS)
    }

    /// Validated amount (raw units) and receiver.
    pub fn validate(&self, ctx: &FlowContext) -> Result<(U256, f64, Address), FlowError> {
        let balance = ctx.balances.as_ref().map(|b| b.token_balance);
        let (raw, value) =
            parse_positive_amount(&self.amount, Self::token_decimals(ctx), balance, "Amount")?;
        let receiver = resolve_receiver(&self.receiver, ctx)?;
        Ok((raw, value, receiver))
    }

    pub fn can_submit(&self, ctx: &FlowContext) -> bool {
        !self.tracker.status().is_busy() && self.validate(ctx).is_ok()
    }

    /// Shares minted at the current NAV.
    pub fn preview_shares(&self, ctx: &FlowContext) -> Option<f64> {
        let (_, value, _) = self.validate(ctx).ok()?;
        Some(preview_deposit_shares(value, ctx.nav_per_share()))
    }

    /// Fill the amount with the whole token balance.
    pub fn fill_max(&mut self, ctx: &FlowContext) {
        if let Some(balances) = &ctx.balances {
            self.amount = balances.token_balance_text.clone();
        }
    }

    pub async fn refresh_allowance(
        &mut self,
        service: &dyn VaultService,
        ctx: &FlowContext,
    ) -> Result<U256, FlowError> {
        let owner = ctx.account()?;
        let allowance = service
            .allowance(owner)
            .await
            .map_err(|e| FlowError::Failed(e.detail().to_string()))?;
        debug!(owner = %owner, allowance = %allowance, "Allowance refreshed");
        self.allowance = Some(allowance);
        Ok(allowance)
    }

    /// `None` until the allowance is known and the form is valid.
    pub fn action(&self, ctx: &FlowContext) -> Option<DepositAction> {
        let (raw, _, _) = self.validate(ctx).ok()?;
        self.allowance.map(|allowance| next_action(allowance, raw))
    }

    /// Approve exactly the requested amount with the vault as spender.
    pub async fn approve(
        &mut self,
        service: &dyn VaultService,
        ctx: &FlowContext,
    ) -> Result<ReceiptSummary, FlowError> {
        let (amount, _, _) = self.validate(ctx)?;
        let call = VaultCall::Approve {
            spender: service.vault_address(),
            amount,
        };
        let receipt = self.tracker.run(service, call).await?;
        self.refresh_allowance(service, ctx).await?;
        Ok(receipt)
    }

    /// `depositBeforeFirstEpoch` until the first epoch starts, `deposit` after.
    pub async fn deposit(
        &mut self,
        service: &dyn VaultService,
        ctx: &FlowContext,
    ) -> Result<ReceiptSummary, FlowError> {
        let (amount, _, receiver) = self.validate(ctx)?;
        let pre_launch = ctx.metrics.as_ref().map(|m| m.is_pre_launch()).unwrap_or(false);
        let call = if pre_launch {
            VaultCall::DepositBeforeFirstEpoch { amount, receiver }
        } else {
            VaultCall::Deposit { amount, receiver }
        };

        let receipt = self.tracker.run(service, call).await?;
        self.amount.clear();
        self.receiver.clear();
        self.allowance = None;
        Ok(receipt)
    }

    /// Approve when needed, then deposit.
    pub async fn submit(
        &mut self,
        service: &dyn VaultService,
        ctx: &FlowContext,
    ) -> Result<ReceiptSummary, FlowError> {
        let (amount, _, _) = self.validate(ctx)?;
        let allowance = self.refresh_allowance(service, ctx).await?;
        if next_action(allowance, amount) == DepositAction::Approve {
            self.approve(service, ctx).await?;
            self.tracker.reset();
        }
        self.deposit(service, ctx).await
    }
}
