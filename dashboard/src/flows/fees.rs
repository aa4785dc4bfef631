//! # Fee Claim Flow
//!
//! Claim accrued fees from the merkle distributor. Anyone may call it; the
//! contract verifies the proof and splits the rewards.

use super::{FlowContext, FlowError, TxStatus, TxTracker, LONG_MESSAGE_BUDGET};
use crate::app::events::AppEvent;
use crate::core::service::VaultService;
use alloy::primitives::{B256, U256};
use async_channel::Sender;
use lib_core::proof::parse_proof;
use lib_evm::{ReceiptSummary, VaultCall};
use std::str::FromStr;

#[derive(Debug)]
pub struct FeeClaimFlow {
    /// Integer wei string
    pub total_accrued: String,
    /// JSON array or comma-separated hex words
    pub proof: String,
    tracker: TxTracker,
}

impl Default for FeeClaimFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl FeeClaimFlow {
    pub fn new() -> Self {
        Self {
            total_accrued: String::new(),
            proof: String::new(),
            tracker: TxTracker::new("claim_fees", LONG_MESSAGE_BUDGET),
        }
    }

    pub fn with_events(mut self, events: Sender<AppEvent>) -> Self {
        self.tracker = self.tracker.with_events(events);
        self
    }

    pub fn status(&self) -> &TxStatus {
        self.tracker.status()
    }

    /// Proof elements as typed; shown as "Parsed N proof element(s)".
    pub fn parsed_proof(&self) -> Vec<String> {
        parse_proof(&self.proof)
    }

    pub fn validate(&self, ctx: &FlowContext) -> Result<(U256, Vec<String>), FlowError> {
        ctx.account()?;

        let total = self.total_accrued.trim();
        if total.is_empty() {
            return Err(FlowError::Invalid("Total accrued is required".to_string()));
        }
        let total_accrued = U256::from_str_radix(total, 10)
            .map_err(|_| FlowError::Invalid("Total accrued must be an integer wei amount".to_string()))?;

        let proof = self.parsed_proof();
        if proof.is_empty() {
            return Err(FlowError::Invalid("Merkle proof is required".to_string()));
        }
        Ok((total_accrued, proof))
    }

    pub fn can_submit(&self, ctx: &FlowContext) -> bool {
        !self.tracker.status().is_busy() && self.validate(ctx).is_ok()
    }

    pub async fn submit(
        &mut self,
        service: &dyn VaultService,
        ctx: &FlowContext,
    ) -> Result<ReceiptSummary, FlowError> {
        let (total_accrued, proof) = self.validate(ctx)?;
        let proof = decode_proof(&proof)?;

        let receipt = self
            .tracker
            .run(service, VaultCall::ClaimFees { total_accrued, proof })
            .await?;
        self.total_accrued.clear();
        self.proof.clear();
        Ok(receipt)
    }
}

/// Every element must be a 32-byte hex word.
fn decode_proof(elements: &[String]) -> Result<Vec<B256>, FlowError> {
    elements
        .iter()
        .map(|element| {
            B256::from_str(element)
                .map_err(|_| FlowError::Invalid(format!("Invalid proof element '{}'", element)))
        })
        .collect()
}
