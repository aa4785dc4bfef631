//! # Governance Flows
//!
//! Admin-only writes: fee receivers and pool votes. The contract enforces the
//! role check; unauthorized calls revert and surface as a failed status.

use super::{parse_address_field, FlowContext, FlowError, TxStatus, TxTracker, SHORT_MESSAGE_BUDGET};
use crate::app::events::AppEvent;
use crate::core::service::VaultService;
use alloy::primitives::{Address, U256};
use async_channel::Sender;
use lib_evm::{ReceiptSummary, VaultCall};

/// Which receiver a [`ReceiverFlow`] updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverKind {
    Fee,
    LpFee,
}

impl ReceiverKind {
    fn flow_name(self) -> &'static str {
        match self {
            ReceiverKind::Fee => "set_fee_receiver",
            ReceiverKind::LpFee => "set_lp_fee_receiver",
        }
    }

    fn call(self, receiver: Address) -> VaultCall {
        match self {
            ReceiverKind::Fee => VaultCall::SetFeeReceiver { receiver },
            ReceiverKind::LpFee => VaultCall::SetLpFeeReceiver { receiver },
        }
    }
}

#[derive(Debug)]
pub struct ReceiverFlow {
    kind: ReceiverKind,
    pub receiver: String,
    tracker: TxTracker,
}

impl ReceiverFlow {
    pub fn new(kind: ReceiverKind) -> Self {
        Self {
            kind,
            receiver: String::new(),
            tracker: TxTracker::new(kind.flow_name(), SHORT_MESSAGE_BUDGET),
        }
    }

    pub fn with_events(mut self, events: Sender<AppEvent>) -> Self {
        self.tracker = self.tracker.with_events(events);
        self
    }

    pub fn kind(&self) -> ReceiverKind {
        self.kind
    }

    pub fn status(&self) -> &TxStatus {
        self.tracker.status()
    }

    pub fn validate(&self, ctx: &FlowContext) -> Result<Address, FlowError> {
        ctx.account()?;
        if self.receiver.trim().is_empty() {
            return Err(FlowError::Invalid("Receiver address is required".to_string()));
        }
        parse_address_field(&self.receiver)
    }

    pub fn can_submit(&self, ctx: &FlowContext) -> bool {
        !self.tracker.status().is_busy() && self.validate(ctx).is_ok()
    }

    pub async fn submit(
        &mut self,
        service: &dyn VaultService,
        ctx: &FlowContext,
    ) -> Result<ReceiptSummary, FlowError> {
        let receiver = self.validate(ctx)?;
        let receipt = self.tracker.run(service, self.kind.call(receiver)).await?;
        self.receiver.clear();
        Ok(receipt)
    }
}

/// One row of the vote form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteEntry {
    pub pool: String,
    /// Integer weight
    pub weight: String,
}

impl VoteEntry {
    pub fn new(pool: impl Into<String>, weight: impl Into<String>) -> Self {
        Self {
            pool: pool.into(),
            weight: weight.into(),
        }
    }

    /// Parse `pool=weight`.
    pub fn parse(text: &str) -> Option<Self> {
        let (pool, weight) = text.split_once('=')?;
        Some(Self::new(pool.trim(), weight.trim()))
    }

    fn is_complete(&self) -> bool {
        !self.pool.trim().is_empty() && !self.weight.trim().is_empty()
    }
}

#[derive(Debug)]
pub struct VoteFlow {
    pub entries: Vec<VoteEntry>,
    tracker: TxTracker,
}

impl Default for VoteFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl VoteFlow {
    pub fn new() -> Self {
        Self {
            entries: vec![VoteEntry::default()],
            tracker: TxTracker::new("vote", SHORT_MESSAGE_BUDGET),
        }
    }

    pub fn with_events(mut self, events: Sender<AppEvent>) -> Self {
        self.tracker = self.tracker.with_events(events);
        self
    }

    pub fn status(&self) -> &TxStatus {
        self.tracker.status()
    }

    pub fn add_entry(&mut self) {
        self.entries.push(VoteEntry::default());
    }

    pub fn remove_entry(&mut self, index: usize) {
        if index < self.entries.len() {
            self.entries.remove(index);
        }
    }

    /// Pools and weights from the complete rows; rows with an empty field are skipped.
    pub fn validate(&self, ctx: &FlowContext) -> Result<(Vec<Address>, Vec<U256>), FlowError> {
        ctx.account()?;

        let mut pools = Vec::new();
        let mut weights = Vec::new();
        for entry in self.entries.iter().filter(|e| e.is_complete()) {
            pools.push(parse_address_field(&entry.pool)?);
            let weight = U256::from_str_radix(entry.weight.trim(), 10).map_err(|_| {
                FlowError::Invalid(format!("Weight '{}' must be a whole number", entry.weight.trim()))
            })?;
            weights.push(weight);
        }

        if pools.is_empty() {
            return Err(FlowError::Invalid("Add at least one pool and weight".to_string()));
        }
        Ok((pools, weights))
    }

    pub fn can_submit(&self, ctx: &FlowContext) -> bool {
        !self.tracker.status().is_busy() && self.validate(ctx).is_ok()
    }

    pub async fn submit(
        &mut self,
        service: &dyn VaultService,
        ctx: &FlowContext,
    ) -> Result<ReceiptSummary, FlowError> {
        let (pools, weights) = self.validate(ctx)?;
        let receipt = self.tracker.run(service, VaultCall::Vote { pools, weights }).await?;
        self.entries = vec![VoteEntry::default()];
        Ok(receipt)
    }
}
