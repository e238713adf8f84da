//! Draft asset endpoints. The client keeps its draft between calls and sends it
//! back with each request; every response carries the draft to keep.

use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Response},
    Json,
};

use super::{AssetKind, AssetUpload};
use crate::auth::Caller;
use crate::errors::AppError;
use crate::lifecycle::{Draft, DraftRejection, Outcome};
use crate::state::AppState;

const FILE_FIELD: &str = "file";
const DRAFT_FIELD: &str = "draft";

impl IntoResponse for DraftRejection {
    fn into_response(self) -> Response {
        let err = AppError::from(self.error);
        let mut body = err.body();
        body["draft"] = serde_json::to_value(&self.draft).unwrap_or_default();
        (err.status(), Json(body)).into_response()
    }
}

fn accepts(kind: AssetKind, content_type: &str) -> bool {
    match kind {
        AssetKind::Photo => content_type.starts_with("image/"),
        AssetKind::Document => content_type == "application/pdf",
    }
}

/// Pulls the file and the optional current draft out of the multipart body.
async fn read_form(kind: AssetKind, mut multipart: Multipart) -> Result<(Draft, AssetUpload), AppError> {
    let mut draft = Draft::default();
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid file: {e}")))?;
                upload = Some(AssetUpload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            Some(DRAFT_FIELD) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid draft: {e}")))?;
                draft = serde_json::from_str(&text)
                    .map_err(|e| AppError::Validation(format!("Invalid draft: {e}")))?;
            }
            _ => {}
        }
    }

    let upload = upload.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;
    if upload.bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if !accepts(kind, &upload.content_type) {
        return Err(AppError::Validation(format!(
            "Unsupported {kind} type '{}'",
            upload.content_type
        )));
    }
    Ok((draft, upload))
}

/// POST /api/v1/drafts/assets/:kind
pub async fn handle_replace_asset(
    State(state): State<AppState>,
    caller: Caller,
    Path(kind): Path<String>,
    multipart: Multipart,
) -> Result<Json<Outcome<Draft>>, Response> {
    caller.require_token().map_err(IntoResponse::into_response)?;
    let kind: AssetKind = kind
        .parse()
        .map_err(|e| AppError::from(e).into_response())?;
    let (draft, upload) = read_form(kind, multipart)
        .await
        .map_err(IntoResponse::into_response)?;

    state
        .lifecycle(&caller)
        .replace_asset(draft, kind, upload)
        .await
        .map(Json)
        .map_err(IntoResponse::into_response)
}

/// POST /api/v1/drafts/assets/:kind/remove
pub async fn handle_remove_asset(
    State(state): State<AppState>,
    caller: Caller,
    Path(kind): Path<String>,
    Json(draft): Json<Draft>,
) -> Result<Json<Draft>, Response> {
    caller.require_token().map_err(IntoResponse::into_response)?;
    let kind: AssetKind = kind
        .parse()
        .map_err(|e| AppError::from(e).into_response())?;

    state
        .lifecycle(&caller)
        .remove_asset(draft, kind)
        .await
        .map(Json)
        .map_err(IntoResponse::into_response)
}
