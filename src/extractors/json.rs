//! JSON request body whose every failure becomes 400 `invalid_request`.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

/// Like `axum::Json`, but ignores `Content-Type` and reports syntax, shape and
/// body-read errors alike as [`AppError::BadRequest`] carrying the parser message.
#[derive(Clone, Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::warn!(%method, %path, error = %e, "could not read request body");
            AppError::BadRequest(e.body_text())
        })?;
        serde_json::from_slice(&bytes).map(JsonBody).map_err(|e| {
            tracing::warn!(%method, %path, error = %e, "invalid JSON body");
            AppError::BadRequest(e.to_string())
        })
    }
}
