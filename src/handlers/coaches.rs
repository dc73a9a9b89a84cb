//! Coach handlers: list, read, create, partial update, delete.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::models::{CoachUpdates, NewCoach};
use crate::response;
use crate::service::CoachService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub async fn list(State(state): State<AppState>) -> Result<Response, AppError> {
    let coaches = CoachService::list(state.db.as_ref()).await?;
    Ok(response::ok(&coaches))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let coach = CoachService::get(state.db.as_ref(), &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("coach {}", id)))?;
    Ok(response::ok(&coach))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewCoach>,
) -> Result<Response, AppError> {
    let coach = CoachService::create(state.db.as_ref(), &body).await?;
    tracing::info!(id = %coach.id, "created coach");
    Ok(response::created(format!("/api/coaches/{}", coach.id), &coach))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(updates): JsonBody<CoachUpdates>,
) -> Result<Response, AppError> {
    let coach = CoachService::update(state.db.as_ref(), &id, &updates)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("coach {}", id)))?;
    Ok(response::ok(&coach))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let removed = CoachService::delete(state.db.as_ref(), &id).await?;
    if removed < 1 {
        tracing::info!(id = %id, "no coach to delete");
        return Err(AppError::NotFound(format!("coach {}", id)));
    }
    tracing::info!(id = %id, "deleted coach");
    Ok(StatusCode::NO_CONTENT.into_response())
}
