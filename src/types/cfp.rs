//! Call-for-proposals records and REST bodies.

use alloy::primitives::{Address, B256};
use serde::{Deserialize, Serialize};

/// A call as recorded by the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CallRecord {
    /// Account that created the call.
    #[serde(serialize_with = "super::checksummed::serialize")]
    pub creator: Address,
    /// Address of the per-call CFP contract.
    #[serde(serialize_with = "super::checksummed::serialize")]
    pub cfp: Address,
}

/// A proposal as recorded by a CFP contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposalRecord {
    /// Account that registered the proposal.
    pub sender: Address,
    /// Block the proposal was registered in.
    pub block_number: u64,
    /// Registration time, Unix seconds.
    pub timestamp: u64,
}

// ============================================================================
// Request bodies
// ============================================================================

/// Body of `POST /create`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCallRequest {
    #[serde(rename = "callId", default)]
    pub call_id: Option<String>,
    /// ISO 8601 closing time, e.g. `2030-06-15T18:30:00Z`.
    #[serde(rename = "closingTime", default)]
    pub closing_time: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
}

/// Body of `POST /register`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
}

/// Body of `POST /register-proposal`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProposalRequest {
    #[serde(rename = "callId", default)]
    pub call_id: Option<String>,
    #[serde(default)]
    pub proposal: Option<String>,
}

/// Body of the account-management utility endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountRequest {
    #[serde(default)]
    pub account: Option<String>,
}

// ============================================================================
// Response bodies
// ============================================================================

/// `{"message": ...}` success body.
#[derive(Debug, Clone, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

impl MessageBody {
    pub fn ok() -> Self {
        Self { message: "OK" }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorizedBody {
    pub authorized: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClosingTimeBody {
    #[serde(rename = "closingTime")]
    pub closing_time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddressBody {
    #[serde(serialize_with = "super::checksummed::serialize")]
    pub address: Address,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProposalBody {
    #[serde(serialize_with = "super::checksummed::serialize")]
    pub sender: Address,
    #[serde(rename = "blockNumber")]
    pub block_number: u64,
    /// ISO 8601 in the server's display offset.
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RandomHexBody {
    pub random_hex: B256,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallsBody {
    pub calls: Vec<B256>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistersBody {
    #[serde(serialize_with = "super::checksummed::vec::serialize")]
    pub registers: Vec<Address>,
}

/// Ready-made signatures for a fresh account, for exercising `/register`
/// and `/create` by hand.
#[derive(Debug, Clone, Serialize)]
pub struct SignatureSample {
    #[serde(serialize_with = "super::checksummed::serialize")]
    pub address: Address,
    pub signature_register: String,
    pub call_id: Vec<B256>,
    pub signature_create: Vec<String>,
}
