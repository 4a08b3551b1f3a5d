//! Calls for proposals over the CFP factory.

use std::sync::Arc;

use alloy::{
    network::ReceiptResponse as _,
    primitives::{Address, B256, U256},
    providers::PendingTransactionBuilder,
};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

use crate::{
    error::{ApiError, AppError, Result},
    ethereum::{
        contracts::cfp::{ICFPFactory, ICFP},
        recover_signer, ContractRevert, NodeClient, NodeProvider, WalletManager,
    },
    types::{
        AccountRequest, AddressBody, AuthorizedBody, CallRecord, CallsBody, ClosingTimeBody,
        CreateCallRequest, MessageBody, ProposalBody, ProposalRecord, ProposalRequest,
        RandomHexBody, RegisterRequest, RegistersBody, SignatureSample,
    },
    validation::{
        is_checksum_address, is_valid_address, is_valid_call_id, is_valid_signature,
        parse_address, parse_hash, parse_signature,
    },
};

/// Random call ids in a signature sample.
const SAMPLE_CALL_IDS: usize = 3;

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Access to the CFP factory and its per-call contracts.
#[async_trait]
pub trait CfpRegistry: Send + Sync {
    /// Address of the factory.
    fn factory_address(&self) -> Address;

    async fn owner(&self) -> Result<Address>;

    /// The call registered under `call_id`, or `None`.
    async fn call(&self, call_id: B256) -> Result<Option<CallRecord>>;

    /// Closing time of the CFP at `cfp`, Unix seconds.
    async fn closing_time(&self, cfp: Address) -> Result<u64>;

    /// The proposal registered in the CFP at `cfp`, or `None`.
    async fn proposal(&self, cfp: Address, proposal: B256) -> Result<Option<ProposalRecord>>;

    async fn is_authorized(&self, account: Address) -> Result<bool>;

    async fn is_registered(&self, account: Address) -> Result<bool>;

    /// Create a call on behalf of `creator`.
    async fn create_call(&self, call_id: B256, closing_time: u64, creator: Address) -> Result<()>;

    async fn register_proposal(&self, call_id: B256, proposal: B256) -> Result<()>;

    /// Owner authorizes `account` to create calls.
    async fn authorize(&self, account: Address) -> Result<()>;

    /// The node-managed `account` asks to be registered.
    async fn request_registration(&self, account: Address) -> Result<()>;

    /// Accounts waiting for authorization.
    async fn pending_registrations(&self) -> Result<Vec<Address>>;

    /// Every call id, creator by creator.
    async fn all_calls(&self) -> Result<Vec<B256>>;
}

/// [`CfpRegistry`] backed by a deployed factory.
///
/// `signer` carries the server wallet (the factory owner). `node` has no
/// wallet and lets the node sign for its own accounts.
pub struct OnChainCfp {
    signer: NodeClient,
    node: NodeClient,
    factory: Address,
}

impl OnChainCfp {
    pub fn new(signer: NodeClient, node: NodeClient, factory: Address) -> Self {
        Self { signer, node, factory }
    }

    fn factory(&self) -> ICFPFactory::ICFPFactoryInstance<NodeProvider> {
        ICFPFactory::new(self.factory, self.signer.provider().clone())
    }

    fn cfp(&self, address: Address) -> ICFP::ICFPInstance<NodeProvider> {
        ICFP::new(address, self.signer.provider().clone())
    }
}

/// Wait for a transaction and fail on a reverted receipt.
async fn confirm(pending: PendingTransactionBuilder<alloy::network::Ethereum>) -> Result<()> {
    let tx = *pending.tx_hash();
    let receipt = pending.get_receipt().await?;

    if !receipt.status() {
        return Err(AppError::Rpc(format!("Transaction {tx} reverted")));
    }

    tracing::debug!(tx = %tx, block = ?receipt.block_number, "Transaction mined");
    Ok(())
}

fn to_u64(value: U256, field: &str) -> Result<u64> {
    u64::try_from(value).map_err(|_| AppError::Parse(format!("{field} out of range: {value}")))
}

#[async_trait]
impl CfpRegistry for OnChainCfp {
    fn factory_address(&self) -> Address {
        self.factory
    }

    async fn owner(&self) -> Result<Address> {
        Ok(self.factory().owner().call().await?)
    }

    async fn call(&self, call_id: B256) -> Result<Option<CallRecord>> {
        let call = self.factory().calls(call_id).call().await?;

        if call.creator.is_zero() {
            return Ok(None);
        }
        Ok(Some(CallRecord { creator: call.creator, cfp: call.cfp }))
    }

    async fn closing_time(&self, cfp: Address) -> Result<u64> {
        let closing_time = self.cfp(cfp).closingTime().call().await?;
        to_u64(closing_time, "closingTime")
    }

    async fn proposal(&self, cfp: Address, proposal: B256) -> Result<Option<ProposalRecord>> {
        let data = self.cfp(cfp).proposalData(proposal).call().await?;

        if data.sender.is_zero() {
            return Ok(None);
        }
        Ok(Some(ProposalRecord {
            sender: data.sender,
            block_number: to_u64(data.blockNumber, "blockNumber")?,
            timestamp: to_u64(data.timestamp, "timestamp")?,
        }))
    }

    async fn is_authorized(&self, account: Address) -> Result<bool> {
        Ok(self.factory().isAuthorized(account).call().await?)
    }

    async fn is_registered(&self, account: Address) -> Result<bool> {
        Ok(self.factory().isRegistered(account).call().await?)
    }

    async fn create_call(&self, call_id: B256, closing_time: u64, creator: Address) -> Result<()> {
        let pending = self
            .factory()
            .createFor(call_id, U256::from(closing_time), creator)
            .send()
            .await?;
        tracing::info!(call_id = %call_id, creator = %creator, tx = %pending.tx_hash(), "createFor sent");
        confirm(pending).await
    }

    async fn register_proposal(&self, call_id: B256, proposal: B256) -> Result<()> {
        let pending = self.factory().registerProposal(call_id, proposal).send().await?;
        tracing::info!(call_id = %call_id, proposal = %proposal, tx = %pending.tx_hash(), "registerProposal sent");
        confirm(pending).await
    }

    async fn authorize(&self, account: Address) -> Result<()> {
        let pending = self.factory().authorize(account).send().await?;
        tracing::info!(account = %account, tx = %pending.tx_hash(), "authorize sent");
        confirm(pending).await
    }

    async fn request_registration(&self, account: Address) -> Result<()> {
        let factory = ICFPFactory::new(self.factory, self.node.provider().clone());
        let pending = factory.register().from(account).send().await?;
        tracing::info!(account = %account, tx = %pending.tx_hash(), "register sent");
        confirm(pending).await
    }

    async fn pending_registrations(&self) -> Result<Vec<Address>> {
        Ok(self.factory().getAllPending().call().await?)
    }

    async fn all_calls(&self) -> Result<Vec<B256>> {
        let factory = self.factory();
        let creators = to_u64(factory.creatorsCount().call().await?, "creatorsCount")?;

        let mut calls = Vec::new();
        for index in 0..creators {
            let creator = factory.creatorsList(U256::from(index)).call().await?;
            let count = to_u64(factory.createdByCount(creator).call().await?, "createdByCount")?;
            for position in 0..count {
                calls.push(factory.createdBy(creator, U256::from(position)).call().await?);
            }
        }

        Ok(calls)
    }
}

/// Message a creator signs to create `call_id`.
pub fn create_message(factory: Address, call_id: B256) -> Vec<u8> {
    [factory.as_slice(), call_id.as_slice()].concat()
}

/// Message an account signs to register.
pub fn register_message(factory: Address) -> Vec<u8> {
    factory.as_slice().to_vec()
}

/// Parse a closing time and require it to be after `now`.
///
/// Accepts RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.fff]` read as UTC.
pub fn parse_closing_time(value: &str, now: DateTime<Utc>) -> ApiResult<u64> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc())
        })
        .map_err(|_| ApiError::InvalidTimeFormat)?;

    if parsed <= now {
        return Err(ApiError::InvalidClosingTime);
    }

    u64::try_from(parsed.timestamp()).map_err(|_| ApiError::InvalidClosingTime)
}

/// Render Unix seconds as RFC 3339 in `offset`.
pub fn format_timestamp(seconds: u64, offset: FixedOffset) -> Result<String> {
    i64::try_from(seconds)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.with_timezone(&offset).to_rfc3339())
        .ok_or_else(|| AppError::Parse(format!("Timestamp out of range: {seconds}")))
}

fn random_b256() -> B256 {
    B256::from(rand::random::<[u8; 32]>())
}

fn checked_call_id(value: Option<&str>) -> ApiResult<B256> {
    value
        .filter(|s| is_valid_call_id(s))
        .and_then(|s| parse_hash(s).ok())
        .ok_or(ApiError::InvalidCallId)
}

fn checked_proposal(value: Option<&str>) -> ApiResult<B256> {
    value
        .filter(|s| is_valid_call_id(s))
        .and_then(|s| parse_hash(s).ok())
        .ok_or(ApiError::InvalidProposal)
}

/// Recover the account that signed `message`.
fn checked_signer(signature: Option<&str>, message: &[u8]) -> ApiResult<Address> {
    let signature = signature
        .filter(|s| is_valid_signature(s))
        .and_then(|s| parse_signature(s).ok())
        .ok_or(ApiError::InvalidSignature)?;

    recover_signer(message, &signature).map_err(|_| ApiError::InvalidSignature)
}

fn checked_account(value: Option<&str>) -> ApiResult<Address> {
    value.and_then(|s| parse_address(s).ok()).ok_or(ApiError::InvalidAddress)
}

/// Map a revert that slipped past the preflight checks.
fn classify_revert(err: AppError) -> ApiError {
    match err {
        AppError::Revert(ContractRevert::CallAlreadyExists) => ApiError::AlreadyCreated,
        AppError::Revert(ContractRevert::NotAuthorized | ContractRevert::NotCreator) => {
            ApiError::Unauthorized
        }
        AppError::Revert(ContractRevert::AlreadyRegistered) => ApiError::AlreadyAuthorized,
        AppError::Revert(ContractRevert::CallNotFound) => ApiError::CallNotFound,
        AppError::Revert(ContractRevert::ProposalAlreadyRegistered) => ApiError::AlreadyRegistered,
        other => ApiError::Internal(other),
    }
}

/// Request handling for the CFP server.
#[derive(Clone)]
pub struct CfpService {
    registry: Arc<dyn CfpRegistry>,
    display_offset: FixedOffset,
}

impl CfpService {
    pub fn new(registry: Arc<dyn CfpRegistry>, display_offset: FixedOffset) -> Self {
        Self { registry, display_offset }
    }

    async fn existing_call(&self, call_id: B256) -> ApiResult<CallRecord> {
        self.registry.call(call_id).await?.ok_or(ApiError::CallNotFound)
    }

    /// `POST /create`
    pub async fn create(&self, request: CreateCallRequest) -> ApiResult<MessageBody> {
        let call_id = checked_call_id(request.call_id.as_deref())?;
        let closing_time = parse_closing_time(
            request.closing_time.as_deref().ok_or(ApiError::InvalidTimeFormat)?,
            Utc::now(),
        )?;
        let message = create_message(self.registry.factory_address(), call_id);
        let creator = checked_signer(request.signature.as_deref(), &message)?;

        if self.registry.call(call_id).await?.is_some() {
            return Err(ApiError::AlreadyCreated);
        }
        if !self.registry.is_authorized(creator).await? {
            return Err(ApiError::Unauthorized);
        }

        self.registry.create_call(call_id, closing_time, creator).await.map_err(classify_revert)?;
        tracing::info!(call_id = %call_id, creator = %creator, closing_time = closing_time, "Call created");
        Ok(MessageBody::ok())
    }

    /// `POST /register`
    pub async fn register(&self, request: RegisterRequest) -> ApiResult<MessageBody> {
        let address = request
            .address
            .as_deref()
            .filter(|s| is_checksum_address(s))
            .and_then(|s| parse_address(s).ok())
            .ok_or(ApiError::InvalidAddress)?;

        let message = register_message(self.registry.factory_address());
        let signer = checked_signer(request.signature.as_deref(), &message)?;
        if signer != address {
            return Err(ApiError::InvalidSignature);
        }

        if self.registry.is_registered(address).await? {
            return Err(ApiError::AlreadyAuthorized);
        }

        self.registry.authorize(address).await.map_err(classify_revert)?;
        tracing::info!(account = %address, "Account authorized");
        Ok(MessageBody::ok())
    }

    /// `POST /register-proposal`
    pub async fn register_proposal(&self, request: ProposalRequest) -> ApiResult<MessageBody> {
        let call_id = checked_call_id(request.call_id.as_deref())?;
        let proposal = checked_proposal(request.proposal.as_deref())?;

        let call = self.existing_call(call_id).await?;
        if self.registry.proposal(call.cfp, proposal).await?.is_some() {
            return Err(ApiError::AlreadyRegistered);
        }

        self.registry.register_proposal(call_id, proposal).await.map_err(classify_revert)?;
        tracing::info!(call_id = %call_id, proposal = %proposal, "Proposal registered");
        Ok(MessageBody::ok())
    }

    /// `GET /authorized/{address}`. Lookup failures read as unauthorized.
    pub async fn authorized(&self, address: &str) -> ApiResult<AuthorizedBody> {
        if !(address.starts_with("0x") && is_valid_address(address)) {
            return Err(ApiError::InvalidAddress);
        }
        let account = parse_address(address).map_err(|_| ApiError::InvalidAddress)?;

        let authorized = match self.registry.is_authorized(account).await {
            Ok(authorized) => authorized,
            Err(e) => {
                tracing::warn!(account = %account, error = %e, "Authorization lookup failed");
                false
            }
        };

        Ok(AuthorizedBody { authorized })
    }

    /// `GET /calls/{callId}`
    pub async fn call(&self, call_id: &str) -> ApiResult<CallRecord> {
        let call_id = checked_call_id(Some(call_id))?;
        self.existing_call(call_id).await
    }

    /// `GET /closing-time/{callId}`
    pub async fn closing_time(&self, call_id: &str) -> ApiResult<ClosingTimeBody> {
        let call_id = checked_call_id(Some(call_id))?;
        let call = self.existing_call(call_id).await?;

        let seconds = self.registry.closing_time(call.cfp).await?;
        Ok(ClosingTimeBody { closing_time: format_timestamp(seconds, self.display_offset)? })
    }

    /// `GET /contract-address`
    pub fn contract_address(&self) -> AddressBody {
        AddressBody { address: self.registry.factory_address() }
    }

    /// `GET /contract-owner`
    pub async fn contract_owner(&self) -> ApiResult<AddressBody> {
        Ok(AddressBody { address: self.registry.owner().await? })
    }

    /// `GET /proposal-data/{callId}/{proposal}`
    pub async fn proposal_data(&self, call_id: &str, proposal: &str) -> ApiResult<ProposalBody> {
        let call_id = checked_call_id(Some(call_id))?;
        let proposal = checked_proposal(Some(proposal))?;

        let call = self.existing_call(call_id).await?;
        let record =
            self.registry.proposal(call.cfp, proposal).await?.ok_or(ApiError::ProposalNotFound)?;

        Ok(ProposalBody {
            sender: record.sender,
            block_number: record.block_number,
            timestamp: format_timestamp(record.timestamp, self.display_offset)?,
        })
    }

    /// `GET /utils/random/hex`
    pub fn random_hex(&self) -> RandomHexBody {
        RandomHexBody { random_hex: random_b256() }
    }

    /// `GET /utils/signature`: signatures of a throwaway account.
    pub fn signature_sample(&self) -> ApiResult<SignatureSample> {
        let factory = self.registry.factory_address();
        let account = WalletManager::random();

        let signature_register = account.sign_message(&register_message(factory))?;
        let call_id: Vec<B256> = (0..SAMPLE_CALL_IDS).map(|_| random_b256()).collect();
        let signature_create = call_id
            .iter()
            .map(|id| {
                account
                    .sign_message(&create_message(factory, *id))
                    .map(|signature| alloy::hex::encode_prefixed(signature.as_bytes()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(SignatureSample {
            address: account.address(),
            signature_register: alloy::hex::encode_prefixed(signature_register.as_bytes()),
            call_id,
            signature_create,
        })
    }

    /// `GET /calls`
    pub async fn list_calls(&self) -> ApiResult<CallsBody> {
        Ok(CallsBody { calls: self.registry.all_calls().await? })
    }

    /// `GET /register/list`
    pub async fn pending_registrations(&self) -> ApiResult<RegistersBody> {
        Ok(RegistersBody { registers: self.registry.pending_registrations().await? })
    }

    /// `POST /utils/register/account`
    pub async fn register_account(&self, request: AccountRequest) -> ApiResult<MessageBody> {
        let account = checked_account(request.account.as_deref())?;

        self.registry.request_registration(account).await?;
        tracing::info!(account = %account, "Registration requested");
        Ok(MessageBody::ok())
    }

    /// `POST /register/auth`
    pub async fn authorize_account(&self, request: AccountRequest) -> ApiResult<MessageBody> {
        let account = checked_account(request.account.as_deref())?;

        if self.registry.is_authorized(account).await? {
            return Err(ApiError::AlreadyAuthorized);
        }

        self.registry.authorize(account).await.map_err(classify_revert)?;
        tracing::info!(account = %account, "Account authorized");
        Ok(MessageBody::ok())
    }
}
