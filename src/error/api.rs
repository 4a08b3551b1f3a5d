//! HTTP error vocabulary shared by the REST servers.

use alloy::primitives::Address;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use super::AppError;

/// Errors surfaced to HTTP clients.
///
/// Every variant maps to a fixed status code and a fixed message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid mimetype")]
    InvalidMimetype,

    #[error("Invalid hash format")]
    InvalidHash,

    #[error("Invalid call id")]
    InvalidCallId,

    #[error("Invalid proposal")]
    InvalidProposal,

    #[error("Invalid address")]
    InvalidAddress,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid time format")]
    InvalidTimeFormat,

    #[error("Invalid closing time")]
    InvalidClosingTime,

    #[error("Hash not found")]
    HashNotFound,

    #[error("Call not found")]
    CallNotFound,

    #[error("Proposal not found")]
    ProposalNotFound,

    /// The hash already has a stamp. Carries the existing record when known.
    #[error("Hash already stamped")]
    AlreadyStamped { signer: Option<Address>, block_number: Option<u64> },

    #[error("Call already exists")]
    AlreadyCreated,

    #[error("Already authorized")]
    AlreadyAuthorized,

    #[error("Proposal already registered")]
    AlreadyRegistered,

    #[error("Unauthorized")]
    Unauthorized,

    /// Anything unexpected. The cause is logged, never returned.
    #[error("Internal error")]
    Internal(#[source] AppError),
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidMimetype
            | ApiError::InvalidHash
            | ApiError::InvalidCallId
            | ApiError::InvalidProposal
            | ApiError::InvalidAddress
            | ApiError::InvalidSignature
            | ApiError::InvalidTimeFormat
            | ApiError::InvalidClosingTime => StatusCode::BAD_REQUEST,
            ApiError::HashNotFound | ApiError::CallNotFound | ApiError::ProposalNotFound => {
                StatusCode::NOT_FOUND
            }
            ApiError::AlreadyStamped { .. }
            | ApiError::AlreadyCreated
            | ApiError::AlreadyAuthorized
            | ApiError::AlreadyRegistered
            | ApiError::Unauthorized => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body for this error.
    pub fn body(&self) -> ErrorBody {
        let (signer, block_number) = match self {
            ApiError::AlreadyStamped { signer, block_number } => (*signer, *block_number),
            _ => (None, None),
        };

        ErrorBody {
            message: self.to_string(),
            signer: signer.map(|address| address.to_checksum(None)),
            block_number,
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::Internal(err)
    }
}

/// Error response body: `{"message": ...}` plus stamp metadata when relevant.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer: Option<String>,
    #[serde(rename = "blockNumber", skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(cause) = &self {
            tracing::error!(error = %cause, "Request failed");
        }

        let mut response = (self.status(), Json(self.body())).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        response
    }
}
