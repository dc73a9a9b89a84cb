//! Read-only tunnel handlers.

use crate::error::AppError;
use crate::response;
use crate::service::TunnelService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::Response,
};

pub async fn list(State(state): State<AppState>) -> Result<Response, AppError> {
    let tunnels = TunnelService::list(state.db.as_ref()).await?;
    Ok(response::ok(&tunnels))
}

/// Non-numeric ids cannot name a tunnel and are reported as 404.
pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Response, AppError> {
    let id: i32 = id_str
        .parse()
        .map_err(|_| AppError::NotFound(format!("tunnel {}", id_str)))?;
    let tunnel = TunnelService::get(state.db.as_ref(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("tunnel {}", id_str)))?;
    Ok(response::ok(&tunnel))
}
