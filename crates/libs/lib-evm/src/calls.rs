//! Write calls accepted by [`crate::VaultClient::submit`].

use alloy::primitives::{Address, B256, U256};

/// Supported CCIP destination chains as `(name, chain selector)`.
pub const CCIP_DESTINATIONS: &[(&str, u64)] = &[
    ("Ethereum Sepolia", 16_015_286_601_757_825_753),
    ("Arbitrum Sepolia", 14_767_482_510_784_806_043),
    ("Optimism Sepolia", 5_224_473_277_236_331_295),
    ("Polygon Amoy", 13_264_668_187_771_770_619),
    ("Base Sepolia", 3_734_403_246_176_062_136),
];

/// Name of a supported destination chain.
pub fn destination_name(selector: u64) -> Option<&'static str> {
    CCIP_DESTINATIONS
        .iter()
        .find(|(_, s)| *s == selector)
        .map(|(name, _)| *name)
}

/// One state-changing contract call.
///
/// `Approve` targets the underlying token; every other variant targets the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultCall {
    Approve { spender: Address, amount: U256 },
    Deposit { amount: U256, receiver: Address },
    DepositBeforeFirstEpoch { amount: U256, receiver: Address },
    RequestRedemption { shares: U256, epoch: U256 },
    ClaimRedemption { shares: U256 },
    ClaimFees { total_accrued: U256, proof: Vec<B256> },
    SetFeeReceiver { receiver: Address },
    SetLpFeeReceiver { receiver: Address },
    Vote { pools: Vec<Address>, weights: Vec<U256> },
    Bridge { chain_selector: u64, receiver: Address, amount: U256 },
}

impl VaultCall {
    /// Contract function name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            VaultCall::Approve { .. } => "approve",
            VaultCall::Deposit { .. } => "deposit",
            VaultCall::DepositBeforeFirstEpoch { .. } => "depositBeforeFirstEpoch",
            VaultCall::RequestRedemption { .. } => "requestRedemptionForEpoch",
            VaultCall::ClaimRedemption { .. } => "claimAvailableRedemptionShares",
            VaultCall::ClaimFees { .. } => "claimFees",
            VaultCall::SetFeeReceiver { .. } => "setFeeReceiver",
            VaultCall::SetLpFeeReceiver { .. } => "setLpFeeReceiver",
            VaultCall::Vote { .. } => "vote",
            VaultCall::Bridge { .. } => "bridgeStPendle",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destinations() {
        assert_eq!(destination_name(16_015_286_601_757_825_753), Some("Ethereum Sepolia"));
        assert_eq!(destination_name(3_734_403_246_176_062_136), Some("Base Sepolia"));
        assert_eq!(destination_name(1), None);
    }

    #[test]
    fn test_call_names() {
        let approve = VaultCall::Approve {
            spender: Address::ZERO,
            amount: U256::from(1u64),
        };
        assert_eq!(approve.name(), "approve");

        let claim = VaultCall::ClaimRedemption { shares: U256::from(1u64) };
        assert_eq!(claim.name(), "claimAvailableRedemptionShares");
    }
}
