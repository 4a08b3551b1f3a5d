//! Routes of the CFP server.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{json_response, JsonBody};
use crate::{
    error::ApiError,
    services::CfpService,
    types::{AccountRequest, CreateCallRequest, ProposalRequest, RegisterRequest},
};

type ApiResponse = Result<Response, ApiError>;

/// Router with every CFP endpoint. CORS is open to any origin.
pub fn router(service: CfpService) -> Router {
    Router::new()
        .route("/create", post(create))
        .route("/register", post(register))
        .route("/register-proposal", post(register_proposal))
        .route("/authorized/{address}", get(authorized))
        .route("/calls", get(list_calls))
        .route("/calls/{call_id}", get(call))
        .route("/closing-time/{call_id}", get(closing_time))
        .route("/contract-address", get(contract_address))
        .route("/contract-owner", get(contract_owner))
        .route("/proposal-data/{call_id}/{proposal}", get(proposal_data))
        .route("/register/list", get(pending_registrations))
        .route("/register/auth", post(authorize_account))
        .route("/utils/random/hex", get(random_hex))
        .route("/utils/signature", get(signature_sample))
        .route("/utils/register/account", post(register_account))
        .with_state(service)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn create(
    State(service): State<CfpService>,
    JsonBody(request): JsonBody<CreateCallRequest>,
) -> ApiResponse {
    Ok(json_response(StatusCode::CREATED, service.create(request).await?))
}

async fn register(
    State(service): State<CfpService>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> ApiResponse {
    Ok(json_response(StatusCode::OK, service.register(request).await?))
}

async fn register_proposal(
    State(service): State<CfpService>,
    JsonBody(request): JsonBody<ProposalRequest>,
) -> ApiResponse {
    Ok(json_response(StatusCode::CREATED, service.register_proposal(request).await?))
}

async fn authorized(State(service): State<CfpService>, Path(address): Path<String>) -> ApiResponse {
    Ok(json_response(StatusCode::OK, service.authorized(&address).await?))
}

async fn call(State(service): State<CfpService>, Path(call_id): Path<String>) -> ApiResponse {
    Ok(json_response(StatusCode::OK, service.call(&call_id).await?))
}

async fn closing_time(
    State(service): State<CfpService>,
    Path(call_id): Path<String>,
) -> ApiResponse {
    Ok(json_response(StatusCode::OK, service.closing_time(&call_id).await?))
}

async fn contract_address(State(service): State<CfpService>) -> Response {
    json_response(StatusCode::OK, service.contract_address())
}

async fn contract_owner(State(service): State<CfpService>) -> ApiResponse {
    Ok(json_response(StatusCode::OK, service.contract_owner().await?))
}

async fn proposal_data(
    State(service): State<CfpService>,
    Path((call_id, proposal)): Path<(String, String)>,
) -> ApiResponse {
    Ok(json_response(StatusCode::OK, service.proposal_data(&call_id, &proposal).await?))
}

async fn list_calls(State(service): State<CfpService>) -> ApiResponse {
    Ok(json_response(StatusCode::OK, service.list_calls().await?))
}

async fn pending_registrations(State(service): State<CfpService>) -> ApiResponse {
    Ok(json_response(StatusCode::OK, service.pending_registrations().await?))
}

async fn authorize_account(
    State(service): State<CfpService>,
    JsonBody(request): JsonBody<AccountRequest>,
) -> ApiResponse {
    Ok(json_response(StatusCode::OK, service.authorize_account(request).await?))
}

async fn register_account(
    State(service): State<CfpService>,
    JsonBody(request): JsonBody<AccountRequest>,
) -> ApiResponse {
    Ok(json_response(StatusCode::OK, service.register_account(request).await?))
}

async fn random_hex(State(service): State<CfpService>) -> Response {
    json_response(StatusCode::OK, service.random_hex())
}

async fn signature_sample(State(service): State<CfpService>) -> ApiResponse {
    Ok(json_response(StatusCode::OK, service.signature_sample()?))
}
