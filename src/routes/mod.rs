//! Route table and the middleware stack around it.

mod api;
mod common;
pub mod cors;

pub use api::api_routes;
pub use common::common_routes;
pub use cors::Cors;

use crate::state::AppState;
use axum::Router;
use std::time::Duration;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Full application: health, `/api` resources, then (inside out) a per-request
/// deadline, a body size cap, CORS and request tracing.
pub fn app(state: AppState, cors_headers: Cors, request_timeout: Duration) -> Router {
    Router::new()
        .merge(common_routes())
        .nest("/api", api_routes())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn_with_state(cors_headers, cors::cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
