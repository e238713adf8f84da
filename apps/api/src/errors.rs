use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::assets::AssetError;
use crate::lifecycle::LifecycleError;
use crate::records::RecordError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Record service error: {0}")]
    Upstream(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Bulk delete incomplete: {message}")]
    PartialBulkDelete {
        status: StatusCode,
        message: String,
        deleted: Vec<String>,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Upstream(_) | AppError::Storage(_) => StatusCode::BAD_GATEWAY,
            AppError::PartialBulkDelete { status, .. } => *status,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The `{"error": {...}}` envelope every failure response carries.
    pub fn body(&self) -> Value {
        let (code, message) = match self {
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => ("UNAUTHORIZED", "Authentication required".to_string()),
            AppError::Forbidden => ("FORBIDDEN", "Access denied".to_string()),
            AppError::Upstream(msg) => {
                tracing::error!("Record service error: {msg}");
                ("UPSTREAM_ERROR", msg.clone())
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                ("STORAGE_ERROR", "A storage error occurred".to_string())
            }
            AppError::PartialBulkDelete { message, deleted, .. } => {
                tracing::warn!("Bulk delete incomplete: {message}");
                return json!({
                    "error": {
                        "code": "BULK_DELETE_INCOMPLETE",
                        "message": message,
                        "deleted": deleted
                    }
                });
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                ("INTERNAL_ERROR", "An internal server error occurred".to_string())
            }
        };

        json!({
            "error": {
                "code": code,
                "message": message
            }
        })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<RecordError> for AppError {
    fn from(e: RecordError) -> Self {
        match e {
            RecordError::NotFound(what) => AppError::NotFound(format!("Resume {what} not found")),
            RecordError::Api { status: 400 | 422, message } => AppError::Validation(message),
            RecordError::Api { status: 401, .. } => AppError::Unauthorized,
            RecordError::Api { status: 403, .. } => AppError::Forbidden,
            other => AppError::Upstream(other.to_string()),
        }
    }
}

/// The status a record service failure surfaces as, matching `From<RecordError>`.
fn record_status(e: &RecordError) -> StatusCode {
    match e {
        RecordError::NotFound(_) => StatusCode::NOT_FOUND,
        RecordError::Api { status: 400 | 422, .. } => StatusCode::BAD_REQUEST,
        RecordError::Api { status: 401, .. } => StatusCode::UNAUTHORIZED,
        RecordError::Api { status: 403, .. } => StatusCode::FORBIDDEN,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl From<AssetError> for AppError {
    fn from(e: AssetError) -> Self {
        match e {
            AssetError::InvalidReference(_) | AssetError::UnknownKind(_) => {
                AppError::Validation(e.to_string())
            }
            other => AppError::Storage(other.to_string()),
        }
    }
}

impl From<LifecycleError> for AppError {
    fn from(e: LifecycleError) -> Self {
        match e {
            LifecycleError::Validation(v) => AppError::Validation(v.to_string()),
            LifecycleError::Asset(e) => e.into(),
            LifecycleError::Record(e) => e.into(),
            LifecycleError::BulkAborted {
                deleted,
                failed_id,
                source,
            } => AppError::PartialBulkDelete {
                status: record_status(&source),
                message: format!(
                    "stopped at '{failed_id}' after {} deletion(s): {source}",
                    deleted.len()
                ),
                deleted,
            },
        }
    }
}
