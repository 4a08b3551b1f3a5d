//! Routes of the stamp server.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::{json_response, JsonBody};
use crate::{error::ApiError, services::StampService, types::StampRequest};

/// Router for `GET /stamped/{hash}` and `POST /stamp`.
pub fn router(service: StampService) -> Router {
    Router::new()
        .route("/stamped/{hash}", get(stamped))
        .route("/stamp", post(stamp))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
}

async fn stamped(
    State(service): State<StampService>,
    Path(hash): Path<String>,
) -> Result<Response, ApiError> {
    let record = service.lookup(&hash).await?;
    Ok(json_response(StatusCode::OK, record))
}

async fn stamp(
    State(service): State<StampService>,
    JsonBody(request): JsonBody<StampRequest>,
) -> Result<Response, ApiError> {
    let created = service.stamp(request).await?;
    Ok(json_response(StatusCode::CREATED, created))
}
