//! Call-for-proposals contract bindings.

use alloy::sol;

// Factory that creates one CFP contract per call
sol! {
    #[sol(rpc)]
    interface ICFPFactory {
        function owner() external view returns (address);
        function calls(bytes32 callId) external view returns (address creator, address cfp);

        function createFor(bytes32 callId, uint256 closingTime, address creator) external returns (address);
        function registerProposal(bytes32 callId, bytes32 proposal) external;

        function register() external;
        function authorize(address creator) external;
        function isRegistered(address account) external view returns (bool);
        function isAuthorized(address account) external view returns (bool);
        function getAllPending() external view returns (address[] memory);

        function creatorsCount() external view returns (uint256);
        function creatorsList(uint256 index) external view returns (address);
        function createdByCount(address creator) external view returns (uint256);
        function createdBy(address creator, uint256 index) external view returns (bytes32);
    }
}

// A single call for proposals
sol! {
    #[sol(rpc)]
    interface ICFP {
        function closingTime() external view returns (uint256);
        function proposalData(bytes32 proposal)
            external
            view
            returns (address sender, uint256 blockNumber, uint256 timestamp);
    }
}
