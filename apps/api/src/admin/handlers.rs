use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::admin::{AdminFilter, AdminPage};
use crate::auth::Caller;
use crate::errors::AppError;
use crate::lifecycle::Outcome;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<String>,
}

/// GET /api/v1/admin/resumes
pub async fn handle_admin_list(
    State(state): State<AppState>,
    caller: Caller,
    Query(filter): Query<AdminFilter>,
) -> Result<Json<AdminPage>, AppError> {
    let all = state.reads(&caller).list_all().await?;
    Ok(Json(filter.apply(all)))
}

/// POST /api/v1/admin/resumes/bulk-delete
///
/// The full list is loaded uncached so asset cleanup uses current references.
pub async fn handle_bulk_delete(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<BulkDeleteRequest>,
) -> Result<Json<Outcome<Vec<String>>>, AppError> {
    if req.ids.is_empty() {
        return Err(AppError::Validation("ids cannot be empty".to_string()));
    }
    let known = state.records.for_caller(&caller).list_all().await?;
    let outcome = state
        .lifecycle(&caller)
        .bulk_delete_resumes(&req.ids, &known)
        .await?;
    Ok(Json(outcome))
}
