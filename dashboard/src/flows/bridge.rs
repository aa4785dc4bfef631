//! # Bridge Flow
//!
//! Send stPENDLE to another chain over CCIP. The destination must be one of
//! [`lib_evm::calls::CCIP_DESTINATIONS`]; the receiver defaults to the connected account.

use super::{
    parse_positive_amount, resolve_receiver, FlowContext, FlowError, TxStatus, TxTracker,
    LONG_MESSAGE_BUDGET,
};
use crate::app::events::AppEvent;
use crate::core::service::VaultService;
use alloy::primitives::{Address, U256};
use async_channel::Sender;
use lib_core::dto::SHARE_DECIMALS;
use lib_evm::calls::destination_name;
use lib_evm::{ReceiptSummary, VaultCall};

#[derive(Debug)]
pub struct BridgeFlow {
    pub amount: String,
    /// CCIP chain selector, decimal
    pub chain_selector: String,
    /// Empty means the connected account
    pub receiver: String,
    fee_token: Option<Address>,
    tracker: TxTracker,
}

impl Default for BridgeFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeFlow {
    pub fn new() -> Self {
        Self {
            amount: String::new(),
            chain_selector: String::new(),
            receiver: String::new(),
            fee_token: None,
            tracker: TxTracker::new("bridge", LONG_MESSAGE_BUDGET),
        }
    }

    pub fn with_events(mut self, events: Sender<AppEvent>) -> Self {
        self.tracker = self.tracker.with_events(events);
        self
    }

    pub fn status(&self) -> &TxStatus {
        self.tracker.status()
    }

    pub fn destination(&self) -> Option<&'static str> {
        self.chain_selector
            .trim()
            .parse::<u64>()
            .ok()
            .and_then(destination_name)
    }

    pub async fn refresh_fee_token(&mut self, service: &dyn VaultService) -> Result<Address, FlowError> {
        let token = service
            .fee_token()
            .await
            .map_err(|e| FlowError::Failed(e.detail().to_string()))?;
        self.fee_token = Some(token);
        Ok(token)
    }

    /// How CCIP fees are paid; `--` until the fee token is read.
    pub fn fee_token_label(&self) -> &'static str {
        match self.fee_token {
            Some(token) if token == Address::ZERO => "Native (ETH)",
            Some(_) => "ERC20",
            None => lib_utils::format::PLACEHOLDER,
        }
    }

    pub fn validate(&self, ctx: &FlowContext) -> Result<(u64, Address, U256), FlowError> {
        let balance = ctx.balances.as_ref().map(|b| b.share_balance).unwrap_or(0.0);
        let (amount, _) = parse_positive_amount(&self.amount, SHARE_DECIMALS, Some(balance), "Amount")?;

        let selector = self
            .chain_selector
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|s| destination_name(*s).is_some())
            .ok_or_else(|| FlowError::Invalid("Select a supported destination chain".to_string()))?;

        let receiver = resolve_receiver(&self.receiver, ctx)?;
        Ok((selector, receiver, amount))
    }

    pub fn can_submit(&self, ctx: &FlowContext) -> bool {
        !self.tracker.status().is_busy() && self.validate(ctx).is_ok()
    }

    /// Fill the amount with the whole share balance.
    pub fn fill_max(&mut self, ctx: &FlowContext) {
        if let Some(balances) = &ctx.balances {
            self.amount = balances.share_balance_text.clone();
        }
    }

    pub async fn submit(
        &mut self,
        service: &dyn VaultService,
        ctx: &FlowContext,
    ) -> Result<ReceiptSummary, FlowError> {
        let (chain_selector, receiver, amount) = self.validate(ctx)?;
        let receipt = self
            .tracker
            .run(
                service,
                VaultCall::Bridge {
                    chain_selector,
                    receiver,
                    amount,
                },
            )
            .await?;
        self.amount.clear();
        self.chain_selector.clear();
        self.receiver.clear();
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mock::MockVault;
    use crate::flows::test_context;

    const BASE_SEPOLIA: &str = "3734403246176062136";

    #[test]
    fn test_validation() {
        let mut ctx = test_context();
        let mut flow = BridgeFlow::new();
        flow.amount = "2".into();
        assert!(!flow.can_submit(&ctx), "no destination");

        flow.chain_selector = "12345".into();
        assert!(!flow.can_submit(&ctx), "unsupported destination");

        flow.chain_selector = BASE_SEPOLIA.into();
        assert_eq!(flow.destination(), Some("Base Sepolia"));
        assert!(flow.can_submit(&ctx));

        flow.amount = "10.5".into();
        assert!(!flow.can_submit(&ctx), "above the share balance");

        flow.amount = "1".into();
        ctx.balances = None;
        assert!(!flow.can_submit(&ctx), "unknown balance");
    }

    #[tokio::test]
    async fn test_fee_token_label() {
        let vault = MockVault::default();
        let mut flow = BridgeFlow::new();
        assert_eq!(flow.fee_token_label(), "--");
        flow.refresh_fee_token(&vault).await.unwrap();
        assert_eq!(flow.fee_token_label(), "ERC20");
    }

    #[tokio::test]
    async fn test_submit_defaults_receiver() {
        let vault = MockVault::default();
        let ctx = test_context();
        let mut flow = BridgeFlow::new();
        flow.fill_max(&ctx);
        flow.chain_selector = BASE_SEPOLIA.into();

        flow.submit(&vault, &ctx).await.unwrap();
        assert_eq!(
            vault.submitted(),
            vec![VaultCall::Bridge {
                chain_selector: 3_734_403_246_176_062_136,
                receiver: ctx.account.unwrap(),
                amount: U256::from(10_000_000_000_000_000_000u128),
            }]
        );
        assert!(flow.chain_selector.is_empty());
    }

    #[tokio::test]
    async fn test_fill_max_bridges_exact_share_balance() {
        let vault = MockVault::default();
        let mut ctx = test_context();
        if let Some(balances) = ctx.balances.as_mut() {
            balances.share_balance_text = "1234.567890123456789012".into();
            balances.share_balance = balances.share_balance_text.parse().unwrap();
        }
        let mut flow = BridgeFlow::new();
        flow.fill_max(&ctx);
        flow.chain_selector = BASE_SEPOLIA.into();

        flow.submit(&vault, &ctx).await.unwrap();
        assert_eq!(
            vault.submitted(),
            vec![VaultCall::Bridge {
                chain_selector: 3_734_403_246_176_062_136,
                receiver: ctx.account.unwrap(),
                amount: U256::from(1_234_567_890_123_456_789_012u128),
            }]
        );
    }
}
