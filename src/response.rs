//! JSON response helpers. Bodies are the bare record or array, never wrapped.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Serialize `body` with the given status and `application/json; charset=utf-8`.
pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8))],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response body");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub fn ok<T: Serialize>(body: &T) -> Response {
    json(StatusCode::OK, body)
}

/// 201 with a `Location` header pointing at the new resource.
pub fn created<T: Serialize>(location: String, body: &T) -> Response {
    let mut response = json(StatusCode::CREATED, body);
    match HeaderValue::from_str(&location) {
        Ok(value) => {
            response.headers_mut().insert(header::LOCATION, value);
        }
        Err(e) => tracing::warn!(location = %location, error = %e, "unusable Location header"),
    }
    response
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

/// 400 `{"error":"invalid_request","message":...}`.
pub fn invalid_request(message: String) -> Response {
    json(
        StatusCode::BAD_REQUEST,
        &ErrorBody {
            error: "invalid_request",
            message,
        },
    )
}
