//! Stamper contract bindings.

use alloy::sol;

// Hash stamping registry
sol! {
    #[sol(rpc)]
    interface IStamper {
        function stamped(bytes32 hash) external view returns (address signer, uint256 blockNumber);
        function stamp(bytes32 hash) external;
        function stampSigned(bytes32 hash, bytes calldata signature) external;
    }
}
