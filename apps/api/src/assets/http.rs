use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use super::{checked_filename, AssetError, AssetKind, AssetRef, AssetStore, AssetUpload, DeleteOutcome};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(alias = "url", alias = "path")]
    reference: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: String,
}

/// Asset store backed by two REST endpoints, one per kind:
/// `POST {base}/` with a multipart file and `DELETE {base}/{filename}`.
#[derive(Clone)]
pub struct HttpAssetStore {
    client: Client,
    photo_base: String,
    document_base: String,
    token: Option<String>,
}

impl HttpAssetStore {
    pub fn new(
        photo_base: impl Into<String>,
        document_base: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            photo_base: photo_base.into().trim_end_matches('/').to_string(),
            document_base: document_base.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn base(&self, kind: AssetKind) -> &str {
        match kind {
            AssetKind::Photo => &self.photo_base,
            AssetKind::Document => &self.document_base,
        }
    }

    /// `{base}/{filename}` with the filename pushed as one encoded path segment.
    fn delete_url(&self, kind: AssetKind, filename: &str) -> Result<Url, AssetError> {
        let filename = checked_filename(filename)?;
        let base = self.base(kind);
        let mut url = Url::parse(base).map_err(|e| AssetError::Endpoint(format!("{base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| AssetError::Endpoint(base.to_string()))?
            .pop_if_empty()
            .push(filename);
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl AssetStore for HttpAssetStore {
    async fn upload(&self, kind: AssetKind, upload: AssetUpload) -> Result<AssetRef, AssetError> {
        let part = multipart::Part::bytes(upload.bytes.to_vec())
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)?;
        let form = multipart::Form::new().part(kind.form_field(), part);

        let url = format!("{}/", self.base(kind));
        let response = self
            .authorize(self.client.post(&url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status, response).await);
        }

        let body: UploadResponse = response.json().await?;
        debug!("Uploaded {kind} asset: {}", body.reference);
        Ok(AssetRef::new(body.reference))
    }

    async fn delete(&self, kind: AssetKind, filename: &str) -> Result<DeleteOutcome, AssetError> {
        let url = self.delete_url(kind, filename)?;
        let response = self.authorize(self.client.delete(url)).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("{kind} asset {filename} was already gone");
            return Ok(DeleteOutcome::NotFound);
        }
        if !status.is_success() {
            return Err(api_error(status, response).await);
        }
        Ok(DeleteOutcome::Deleted)
    }
}

async fn api_error(status: StatusCode, response: reqwest::Response) -> AssetError {
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or(body);
    AssetError::Api {
        status: status.as_u16(),
        message,
    }
}
