//! Hash stamping over the Stamper contract.

use std::sync::Arc;

use alloy::{
    network::ReceiptResponse as _,
    primitives::{Address, Bytes, B256},
};
use async_trait::async_trait;

use crate::{
    error::{ApiError, Result},
    ethereum::{constants::STAMP_GAS_LIMIT, contracts::stamper::IStamper, recover_signer, NodeClient},
    types::{StampCreated, StampReceipt, StampRecord, StampRequest},
    validation::{is_valid_hash, is_valid_signature, parse_hash, parse_signature},
};

/// Access to the stamp registry.
#[async_trait]
pub trait StampRegistry: Send + Sync {
    /// The stamp of `hash`, or `None` when it was never stamped.
    async fn stamped(&self, hash: B256) -> Result<Option<StampRecord>>;

    /// Stamp `hash`, optionally with the client's signature, and wait for
    /// the receipt.
    async fn stamp(&self, hash: B256, signature: Option<Bytes>) -> Result<StampReceipt>;
}

/// [`StampRegistry`] backed by a deployed Stamper.
///
/// The client must carry the wallet that signs stamp transactions.
pub struct OnChainStamper {
    client: NodeClient,
    address: Address,
}

impl OnChainStamper {
    pub fn new(client: NodeClient, address: Address) -> Self {
        Self { client, address }
    }

    fn contract(&self) -> IStamper::IStamperInstance<crate::ethereum::NodeProvider> {
        IStamper::new(self.address, self.client.provider().clone())
    }
}

#[async_trait]
impl StampRegistry for OnChainStamper {
    async fn stamped(&self, hash: B256) -> Result<Option<StampRecord>> {
        let record = self.contract().stamped(hash).call().await?;

        // A zero block number marks an unknown hash.
        if record.blockNumber.is_zero() {
            return Ok(None);
        }

        Ok(Some(StampRecord {
            signer: record.signer,
            block_number: record.blockNumber.saturating_to::<u64>(),
        }))
    }

    async fn stamp(&self, hash: B256, signature: Option<Bytes>) -> Result<StampReceipt> {
        let contract = self.contract();
        let pending = match signature {
            Some(signature) => {
                contract.stampSigned(hash, signature).gas(STAMP_GAS_LIMIT).send().await?
            }
            None => contract.stamp(hash).gas(STAMP_GAS_LIMIT).send().await?,
        };

        tracing::info!(hash = %hash, tx = %pending.tx_hash(), "Stamp transaction sent");
        let receipt = pending.get_receipt().await?;

        Ok(StampReceipt {
            transaction: receipt.transaction_hash,
            block_number: receipt.block_number,
            success: receipt.status(),
        })
    }
}

/// Request handling for the stamp server.
#[derive(Clone)]
pub struct StampService {
    registry: Arc<dyn StampRegistry>,
}

impl StampService {
    pub fn new(registry: Arc<dyn StampRegistry>) -> Self {
        Self { registry }
    }

    /// `GET /stamped/{hash}`
    pub async fn lookup(&self, hash: &str) -> std::result::Result<StampRecord, ApiError> {
        let hash = checked_hash(hash)?;

        self.registry.stamped(hash).await?.ok_or(ApiError::HashNotFound)
    }

    /// `POST /stamp`
    pub async fn stamp(&self, request: StampRequest) -> std::result::Result<StampCreated, ApiError> {
        let hash = checked_hash(request.hash.as_deref().unwrap_or_default())?;

        if let Some(existing) = self.registry.stamped(hash).await? {
            return Err(ApiError::AlreadyStamped {
                signer: Some(existing.signer),
                block_number: Some(existing.block_number),
            });
        }

        let signature = match request.signature.as_deref() {
            Some(signature) => Some(checked_signature(hash, signature)?),
            None => None,
        };

        let receipt = self.registry.stamp(hash, signature).await?;
        if !receipt.success {
            tracing::warn!(hash = %hash, tx = %receipt.transaction, "Stamp transaction failed");
            return Err(ApiError::AlreadyStamped { signer: None, block_number: receipt.block_number });
        }

        tracing::info!(hash = %hash, block = ?receipt.block_number, "Hash stamped");
        Ok(StampCreated { transaction: receipt.transaction, block_number: receipt.block_number })
    }
}

fn checked_hash(hash: &str) -> std::result::Result<B256, ApiError> {
    if !is_valid_hash(hash) {
        return Err(ApiError::InvalidHash);
    }
    parse_hash(hash).map_err(|_| ApiError::InvalidHash)
}

/// The signature must recover to some account over the hash bytes.
fn checked_signature(hash: B256, signature: &str) -> std::result::Result<Bytes, ApiError> {
    if !is_valid_signature(signature) {
        return Err(ApiError::InvalidSignature);
    }

    let parsed = parse_signature(signature).map_err(|_| ApiError::InvalidSignature)?;
    let signer =
        recover_signer(hash.as_slice(), &parsed).map_err(|_| ApiError::InvalidSignature)?;
    tracing::debug!(hash = %hash, signer = %signer, "Signature recovered");

    Ok(Bytes::from(parsed.as_bytes().to_vec()))
}
