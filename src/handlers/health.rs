//! Liveness with a database ping.

use crate::response;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Response};
use serde::Serialize;
use std::time::Duration;

const PING_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    db: &'static str,
}

/// 200 `{"status":"healthy","db":"up"}`, or 503 when the ping fails or takes too long.
pub async fn healthcheck(State(state): State<AppState>) -> Response {
    let ping = tokio::time::timeout(PING_TIMEOUT, state.db.query_one("SELECT 1", &[])).await;
    match ping {
        Ok(Ok(_)) => response::json(
            StatusCode::OK,
            &HealthBody {
                status: "healthy",
                db: "up",
            },
        ),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "database ping failed");
            unhealthy()
        }
        Err(_) => {
            tracing::warn!(timeout = ?PING_TIMEOUT, "database ping timed out");
            unhealthy()
        }
    }
}

fn unhealthy() -> Response {
    response::json(
        StatusCode::SERVICE_UNAVAILABLE,
        &HealthBody {
            status: "unhealthy",
            db: "down",
        },
    )
}
