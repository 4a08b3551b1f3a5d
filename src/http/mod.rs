//! HTTP front ends for the stamp and CFP servers.

pub mod cfp;
mod extract;
mod server;
pub mod stamp;

pub use extract::JsonBody;
pub use server::serve;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// JSON response with an explicit UTF-8 charset.
pub(crate) fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json; charset=utf-8"));
    response
}
