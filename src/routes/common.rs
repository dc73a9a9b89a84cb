//! Common routes: health.

use crate::handlers::health::healthcheck;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn common_routes() -> Router<AppState> {
    Router::new().route("/healthcheck", get(healthcheck))
}
