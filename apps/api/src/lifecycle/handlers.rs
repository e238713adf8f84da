//! Resume mutation endpoints. Everything that can create, change or destroy a
//! resume goes through `ResumeLifecycle`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::warn;

use crate::auth::Caller;
use crate::errors::AppError;
use crate::lifecycle::{Draft, Outcome};
use crate::models::Resume;
use crate::state::AppState;

/// POST /api/v1/resumes
pub async fn handle_create(
    State(state): State<AppState>,
    caller: Caller,
    Json(draft): Json<Draft>,
) -> Result<(StatusCode, Json<Outcome<Resume>>), AppError> {
    caller.require_token()?;
    let created = state.lifecycle(&caller).create_resume(&draft).await?;
    Ok((StatusCode::CREATED, Json(Outcome::clean(created))))
}

/// PUT /api/v1/resumes/me
pub async fn handle_update_mine(
    State(state): State<AppState>,
    caller: Caller,
    Json(draft): Json<Draft>,
) -> Result<Json<Outcome<Resume>>, AppError> {
    caller.require_token()?;
    let updated = state.lifecycle(&caller).update_mine(&draft).await?;
    Ok(Json(Outcome::clean(updated)))
}

/// PUT /api/v1/resumes/:id
pub async fn handle_update_by_id(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(draft): Json<Draft>,
) -> Result<Json<Outcome<Resume>>, AppError> {
    let updated = state.lifecycle(&caller).update_by_id(&id, &draft).await?;
    Ok(Json(Outcome::clean(updated)))
}

/// DELETE /api/v1/resumes/:id
///
/// Loads the record uncached first so the cascade sees its current assets.
pub async fn handle_delete_by_id(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Outcome<()>>, AppError> {
    let record = state.records.for_caller(&caller).get_by_id(&id).await?;
    let outcome = state.lifecycle(&caller).delete_resume(&record).await?;
    if !outcome.is_clean() {
        warn!("Resume {id} deleted with {} orphaned asset(s)", outcome.cleanup_failures.len());
    }
    Ok(Json(outcome))
}

/// DELETE /api/v1/resumes/me
pub async fn handle_delete_mine(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Outcome<()>>, AppError> {
    caller.require_token()?;
    let record = state
        .records
        .for_caller(&caller)
        .get_mine()
        .await?
        .ok_or_else(|| AppError::NotFound("You have not submitted a resume yet".to_string()))?;
    let outcome = state.lifecycle(&caller).delete_my_resume(&record).await?;
    Ok(Json(outcome))
}

/// PATCH /api/v1/resumes/:id/hire-status
pub async fn handle_toggle_hire_status(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Outcome<Resume>>, AppError> {
    let updated = state.lifecycle(&caller).toggle_hire_status(&id).await?;
    Ok(Json(Outcome::clean(updated)))
}
