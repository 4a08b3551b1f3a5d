//! Common utilities for integration tests.

#![allow(dead_code)]

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Mutex,
};

use alloy::primitives::{address, Address, Bytes, TxHash, B256, U256};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use bfa_toolkit::{
    ethereum::ContractRevert,
    services::{BlockSource, CfpRegistry, StampRegistry},
    types::{CallRecord, ProposalRecord, StampReceipt, StampRecord, TransferRecord},
    AppError, Result,
};
use tower::ServiceExt;

pub const FACTORY: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
pub const OWNER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// A `0x`-prefixed 32-byte value made of `byte`.
pub fn hex32(byte: u8) -> String {
    B256::repeat_byte(byte).to_string()
}

/// Drive `router` with a single request; returns status and JSON body.
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method(Method::GET).uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_raw(uri: &str, content_type: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ============================================================================
// Stamp registry
// ============================================================================

/// In-memory Stamper.
pub struct MockStampRegistry {
    pub stamps: Mutex<HashMap<B256, StampRecord>>,
    /// Stamp transactions sent, with their signatures.
    pub sent: Mutex<Vec<(B256, Option<Bytes>)>>,
    /// Mine stamp transactions with a failed status.
    pub fail_receipts: bool,
    pub block_number: u64,
}

impl Default for MockStampRegistry {
    fn default() -> Self {
        Self {
            stamps: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            fail_receipts: false,
            block_number: 1194114,
        }
    }
}

impl MockStampRegistry {
    pub fn with_stamp(self, hash: B256, record: StampRecord) -> Self {
        self.stamps.lock().unwrap().insert(hash, record);
        self
    }
}

#[async_trait]
impl StampRegistry for MockStampRegistry {
    async fn stamped(&self, hash: B256) -> Result<Option<StampRecord>> {
        Ok(self.stamps.lock().unwrap().get(&hash).copied())
    }

    async fn stamp(&self, hash: B256, signature: Option<Bytes>) -> Result<StampReceipt> {
        self.sent.lock().unwrap().push((hash, signature));
        let transaction = TxHash::repeat_byte(0xee);

        if self.fail_receipts {
            return Ok(StampReceipt {
                transaction,
                block_number: Some(self.block_number),
                success: false,
            });
        }

        self.stamps
            .lock()
            .unwrap()
            .insert(hash, StampRecord { signer: OWNER, block_number: self.block_number });
        Ok(StampReceipt { transaction, block_number: Some(self.block_number), success: true })
    }
}

// ============================================================================
// CFP registry
// ============================================================================

/// In-memory CFP factory.
pub struct MockCfpRegistry {
    pub calls: Mutex<HashMap<B256, CallRecord>>,
    pub closing_times: Mutex<HashMap<Address, u64>>,
    pub proposals: Mutex<HashMap<(Address, B256), ProposalRecord>>,
    pub authorized: Mutex<HashSet<Address>>,
    pub registered: Mutex<HashSet<Address>>,
    pub pending: Mutex<Vec<Address>>,
    /// Accounts the node manages.
    pub node_accounts: Vec<Address>,
    /// Revert every transaction with this reason.
    pub revert: Option<ContractRevert>,
    /// Fail every view call.
    pub fail_lookups: bool,
}

impl Default for MockCfpRegistry {
    fn default() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
            closing_times: Mutex::new(HashMap::new()),
            proposals: Mutex::new(HashMap::new()),
            authorized: Mutex::new(HashSet::new()),
            registered: Mutex::new(HashSet::new()),
            pending: Mutex::new(Vec::new()),
            node_accounts: vec![OWNER],
            revert: None,
            fail_lookups: false,
        }
    }
}

impl MockCfpRegistry {
    /// Registry with one call created by `creator`.
    pub fn with_call(self, call_id: B256, creator: Address, closing_time: u64) -> Self {
        let cfp = Address::from_word(call_id);
        self.calls.lock().unwrap().insert(call_id, CallRecord { creator, cfp });
        self.closing_times.lock().unwrap().insert(cfp, closing_time);
        self
    }

    pub fn with_proposal(self, call_id: B256, proposal: B256, record: ProposalRecord) -> Self {
        let cfp = Address::from_word(call_id);
        self.proposals.lock().unwrap().insert((cfp, proposal), record);
        self
    }

    pub fn with_authorized(self, account: Address) -> Self {
        self.authorized.lock().unwrap().insert(account);
        self.registered.lock().unwrap().insert(account);
        self
    }

    fn lookup(&self) -> Result<()> {
        if self.fail_lookups {
            return Err(AppError::Rpc("node unavailable".to_string()));
        }
        Ok(())
    }

    fn transact(&self) -> Result<()> {
        match &self.revert {
            Some(reason) => Err(AppError::Revert(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CfpRegistry for MockCfpRegistry {
    fn factory_address(&self) -> Address {
        FACTORY
    }

    async fn owner(&self) -> Result<Address> {
        self.lookup()?;
        Ok(OWNER)
    }

    async fn call(&self, call_id: B256) -> Result<Option<CallRecord>> {
        self.lookup()?;
        Ok(self.calls.lock().unwrap().get(&call_id).copied())
    }

    async fn closing_time(&self, cfp: Address) -> Result<u64> {
        self.lookup()?;
        self.closing_times
            .lock()
            .unwrap()
            .get(&cfp)
            .copied()
            .ok_or_else(|| AppError::Rpc("no such contract".to_string()))
    }

    async fn proposal(&self, cfp: Address, proposal: B256) -> Result<Option<ProposalRecord>> {
        self.lookup()?;
        Ok(self.proposals.lock().unwrap().get(&(cfp, proposal)).copied())
    }

    async fn is_authorized(&self, account: Address) -> Result<bool> {
        self.lookup()?;
        Ok(self.authorized.lock().unwrap().contains(&account))
    }

    async fn is_registered(&self, account: Address) -> Result<bool> {
        self.lookup()?;
        Ok(self.registered.lock().unwrap().contains(&account))
    }

    async fn create_call(&self, call_id: B256, closing_time: u64, creator: Address) -> Result<()> {
        self.transact()?;
        let cfp = Address::from_word(call_id);
        self.calls.lock().unwrap().insert(call_id, CallRecord { creator, cfp });
        self.closing_times.lock().unwrap().insert(cfp, closing_time);
        Ok(())
    }

    async fn register_proposal(&self, call_id: B256, proposal: B256) -> Result<()> {
        self.transact()?;
        let cfp = Address::from_word(call_id);
        self.proposals.lock().unwrap().insert(
            (cfp, proposal),
            ProposalRecord { sender: OWNER, block_number: 10, timestamp: 1_686_853_800 },
        );
        Ok(())
    }

    async fn authorize(&self, account: Address) -> Result<()> {
        self.transact()?;
        self.authorized.lock().unwrap().insert(account);
        self.registered.lock().unwrap().insert(account);
        self.pending.lock().unwrap().retain(|pending| *pending != account);
        Ok(())
    }

    async fn request_registration(&self, account: Address) -> Result<()> {
        self.transact()?;
        if !self.node_accounts.contains(&account) {
            return Err(AppError::Rpc("unknown account".to_string()));
        }
        self.pending.lock().unwrap().push(account);
        Ok(())
    }

    async fn pending_registrations(&self) -> Result<Vec<Address>> {
        self.lookup()?;
        Ok(self.pending.lock().unwrap().clone())
    }

    async fn all_calls(&self) -> Result<Vec<B256>> {
        self.lookup()?;
        let mut calls: Vec<B256> = self.calls.lock().unwrap().keys().copied().collect();
        calls.sort();
        Ok(calls)
    }
}

// ============================================================================
// Block source
// ============================================================================

/// Fixed chain of blocks.
#[derive(Default)]
pub struct MockBlockSource {
    pub blocks: BTreeMap<u64, Vec<TransferRecord>>,
    pub latest: u64,
    /// Blocks requested, in order.
    pub visited: Mutex<Vec<u64>>,
}

impl MockBlockSource {
    pub fn new(latest: u64) -> Self {
        Self { latest, ..Default::default() }
    }

    pub fn with_transfer(mut self, block: u64, from: Address, to: Address, wei: u128) -> Self {
        self.blocks.entry(block).or_default().push(TransferRecord {
            from,
            to,
            value: U256::from(wei),
            block_number: block,
        });
        self
    }
}

#[async_trait]
impl BlockSource for MockBlockSource {
    async fn latest_block(&self) -> Result<u64> {
        Ok(self.latest)
    }

    async fn block_transfers(&self, number: u64) -> Result<Vec<TransferRecord>> {
        self.visited.lock().unwrap().push(number);
        Ok(self.blocks.get(&number).cloned().unwrap_or_default())
    }
}
