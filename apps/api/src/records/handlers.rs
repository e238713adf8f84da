//! Read-only resume endpoints. These go straight to the record service (through
//! the read cache) since they never touch assets.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::auth::Caller;
use crate::errors::AppError;
use crate::models::{ListFilter, Resume, ResumePage, ResumeStats};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

fn page_and_limit(page: Option<u32>, limit: Option<u32>) -> (u32, u32) {
    (
        page.unwrap_or(1).max(1),
        limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
    )
}

/// GET /api/v1/resumes
pub async fn handle_list(
    State(state): State<AppState>,
    caller: Caller,
    Query(filter): Query<ListFilter>,
) -> Result<Json<ResumePage>, AppError> {
    let (page, limit) = page_and_limit(filter.page, filter.limit);
    let filter = ListFilter {
        page: Some(page),
        limit: Some(limit),
        ..filter
    };
    Ok(Json(state.reads(&caller).list(&filter).await?))
}

/// GET /api/v1/resumes/all
pub async fn handle_list_all(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<Resume>>, AppError> {
    Ok(Json(state.reads(&caller).list_all().await?))
}

/// GET /api/v1/resumes/search
pub async fn handle_search(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ResumePage>, AppError> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(AppError::Validation("q cannot be empty".to_string()));
    }
    let (page, limit) = page_and_limit(query.page, query.limit);
    Ok(Json(state.reads(&caller).search(q, page, limit).await?))
}

/// GET /api/v1/resumes/stats
pub async fn handle_stats(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<ResumeStats>, AppError> {
    Ok(Json(state.reads(&caller).stats().await?))
}

/// GET /api/v1/resumes/me
pub async fn handle_get_mine(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Resume>, AppError> {
    caller.require_token()?;
    state
        .reads(&caller)
        .get_mine()
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("You have not submitted a resume yet".to_string()))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_by_id(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(state.reads(&caller).get_by_id(&id).await?))
}
