//! Reservation handlers: list, read, create, partial update, delete, window search.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::models::{NewReservation, ReservationUpdates, SearchParams, SearchWindow};
use crate::response;
use crate::service::ReservationService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub async fn list(State(state): State<AppState>) -> Result<Response, AppError> {
    let reservations = ReservationService::list(state.db.as_ref()).await?;
    Ok(response::ok(&reservations))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let reservation = ReservationService::get(state.db.as_ref(), &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("reservation {}", id)))?;
    Ok(response::ok(&reservation))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewReservation>,
) -> Result<Response, AppError> {
    let reservation = ReservationService::create(state.db.as_ref(), &body).await?;
    tracing::info!(id = %reservation.id, "created reservation");
    Ok(response::created(
        format!("/api/reservations/{}", reservation.id),
        &reservation,
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(updates): JsonBody<ReservationUpdates>,
) -> Result<Response, AppError> {
    let reservation = ReservationService::update(state.db.as_ref(), &id, &updates)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("reservation {}", id)))?;
    Ok(response::ok(&reservation))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let removed = ReservationService::delete(state.db.as_ref(), &id).await?;
    if removed < 1 {
        tracing::info!(id = %id, "no reservation to delete");
        return Err(AppError::NotFound(format!("reservation {}", id)));
    }
    tracing::info!(id = %id, "deleted reservation");
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// `?from=&to=&tunnel_id=`; a malformed or inverted window is a 400.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, AppError> {
    let window = SearchWindow::parse(&params)?;
    let reservations = ReservationService::search(state.db.as_ref(), &window).await?;
    Ok(response::ok(&reservations))
}
