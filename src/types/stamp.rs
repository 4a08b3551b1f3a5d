//! Stamper records and REST bodies.

use alloy::primitives::{Address, TxHash};
use serde::{Deserialize, Serialize};

/// A stamp as recorded by the Stamper contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampRecord {
    /// Account that stamped the hash.
    #[serde(serialize_with = "super::checksummed::serialize")]
    pub signer: Address,
    /// Block in which the hash was stamped.
    #[serde(rename = "blockNumber")]
    pub block_number: u64,
}

/// Outcome of a mined stamp transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StampReceipt {
    /// Transaction hash.
    pub transaction: TxHash,
    /// Block the transaction was mined in.
    pub block_number: Option<u64>,
    /// Whether the transaction executed without reverting.
    pub success: bool,
}

/// Body of `POST /stamp`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StampRequest {
    /// `0x`-prefixed 32-byte hash.
    #[serde(default)]
    pub hash: Option<String>,
    /// Optional `0x`-prefixed 65-byte signature of the hash.
    #[serde(default)]
    pub signature: Option<String>,
}

/// Body returned by a successful `POST /stamp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampCreated {
    pub transaction: TxHash,
    #[serde(rename = "blockNumber")]
    pub block_number: Option<u64>,
}
