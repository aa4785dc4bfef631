//! stPENDLE vault and ERC-20 interface definitions.

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IStPendle {
        // Vault state
        function totalAssets() external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function totalLockedPendle() external view returns (uint256);
        function getCurrentEpoch() external view returns (uint256);
        function epochDuration() external view returns (uint256);
        function currentEpochStart() external view returns (uint256);
        function preLockRedemptionPeriod() external view returns (uint256);
        function asset() external view returns (address);
        function feeToken() external view returns (address);

        // Account state
        function balanceOf(address account) external view returns (uint256);
        function getUserAvailableRedemption(address user) external view returns (uint256);

        // Redemption queue
        function getAvailableRedemptionAmount() external view returns (uint256);
        function totalRequestedRedemptionAmountPerEpoch(uint256 epoch) external view returns (uint256);

        // Deposits
        function deposit(uint256 amount, address receiver) external returns (uint256 shares);
        function depositBeforeFirstEpoch(uint256 amount, address receiver) external returns (uint256 shares);

        // Redemptions
        function requestRedemptionForEpoch(uint256 shares, uint256 epoch) external;
        function claimAvailableRedemptionShares(uint256 shares) external returns (uint256 assets);

        // Fees
        function claimFees(uint256 totalAccrued, bytes32[] calldata proof) external;
        function setFeeReceiver(address receiver) external;
        function setLpFeeReceiver(address receiver) external;

        // Governance
        function vote(address[] calldata pools, uint256[] calldata weights) external;

        // Cross-chain
        function bridgeStPendle(uint64 destinationChainSelector, address receiver, uint256 amount) external returns (bytes32 messageId);
    }
}

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function decimals() external view returns (uint8);
        function symbol() external view returns (string);
    }
}
