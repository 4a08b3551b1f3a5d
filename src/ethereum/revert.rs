//! Typed classification of contract reverts.
//!
//! The deployed contracts revert with fixed reason strings. They are decoded
//! from the revert data of the RPC error and matched exactly.

use std::fmt;

use alloy::sol_types::{decode_revert_reason, Revert, SolError};

// Reason strings emitted by the deployed CFP factory.
const REASON_CALL_EXISTS: &str = "El llamado ya existe";
const REASON_NOT_AUTHORIZED: &str = "No autorizado";
const REASON_NOT_CREATOR: &str = "Solo el creador puede hacer esta llamada";
const REASON_ALREADY_REGISTERED: &str = "Ya se ha registrado";
const REASON_CALL_MISSING: &str = "El llamado no existe";
const REASON_PROPOSAL_EXISTS: &str = "La propuesta ya ha sido registrada";

/// A business-rule violation reported by a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractRevert {
    CallAlreadyExists,
    NotAuthorized,
    NotCreator,
    AlreadyRegistered,
    CallNotFound,
    ProposalAlreadyRegistered,
    /// A revert whose reason is not part of the known vocabulary.
    Other(String),
}

impl ContractRevert {
    /// Classify a decoded revert reason.
    pub fn from_reason(reason: &str) -> Self {
        match reason.trim() {
            REASON_CALL_EXISTS => ContractRevert::CallAlreadyExists,
            REASON_NOT_AUTHORIZED => ContractRevert::NotAuthorized,
            REASON_NOT_CREATOR => ContractRevert::NotCreator,
            REASON_ALREADY_REGISTERED => ContractRevert::AlreadyRegistered,
            REASON_CALL_MISSING => ContractRevert::CallNotFound,
            REASON_PROPOSAL_EXISTS => ContractRevert::ProposalAlreadyRegistered,
            other => ContractRevert::Other(other.to_string()),
        }
    }

    /// Classify raw revert data (ABI-encoded `Error(string)` or similar).
    ///
    /// Returns `None` when the data carries no decodable reason.
    pub fn from_revert_data(data: &[u8]) -> Option<Self> {
        if data.is_empty() {
            return None;
        }
        let reason = match Revert::abi_decode(data) {
            Ok(revert) => revert.reason,
            Err(_) => decode_revert_reason(data)?,
        };
        if reason.trim().is_empty() {
            return None;
        }
        Some(Self::from_reason(&reason))
    }

    /// Extract and classify the revert carried by a contract call error.
    pub fn from_contract_error(err: &alloy::contract::Error) -> Option<Self> {
        err.as_revert_data().and_then(|data| Self::from_revert_data(&data))
    }
}

impl fmt::Display for ContractRevert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractRevert::CallAlreadyExists => f.write_str("call already exists"),
            ContractRevert::NotAuthorized => f.write_str("not authorized"),
            ContractRevert::NotCreator => f.write_str("only the creator may do this"),
            ContractRevert::AlreadyRegistered => f.write_str("already registered"),
            ContractRevert::CallNotFound => f.write_str("call does not exist"),
            ContractRevert::ProposalAlreadyRegistered => f.write_str("proposal already registered"),
            ContractRevert::Other(reason) => write!(f, "{reason}"),
        }
    }
}
