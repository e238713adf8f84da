//! Asset Store client: binary storage for resume photos and PDF documents.
//!
//! Each `AssetKind` lives in its own namespace. The store is a thin transport;
//! it performs no content validation and never inspects the bytes it moves.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod handlers;
pub mod http;
pub mod s3;

pub use http::HttpAssetStore;
pub use s3::S3AssetStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Photo,
    Document,
}

impl AssetKind {
    /// Multipart field name the storage endpoint expects for this kind.
    pub fn form_field(self) -> &'static str {
        match self {
            AssetKind::Photo => "photo",
            AssetKind::Document => "pdf",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssetKind::Photo => "photo",
            AssetKind::Document => "document",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "photo" => Ok(AssetKind::Photo),
            "document" | "pdf" | "file" => Ok(AssetKind::Document),
            other => Err(AssetError::UnknownKind(other.to_string())),
        }
    }
}

/// Handle to stored binary content, as returned by the store (a URL or path).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(String);

impl AssetRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Storage-layer filename: the final path segment of the reference,
    /// percent-decoded.
    pub fn filename(&self) -> Result<String, AssetError> {
        let invalid = || AssetError::InvalidReference(self.0.clone());
        let path = self.0.split(['?', '#']).next().unwrap_or_default();
        let segment = path.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
        let decoded = urlencoding::decode(segment).map_err(|_| invalid())?;
        checked_filename(&decoded).map_err(|_| invalid())?;
        Ok(decoded.into_owned())
    }
}

/// Rejects names that would leave the kind's namespace once placed in a
/// path: empty, `.`, `..`, or containing a separator.
pub fn checked_filename(name: &str) -> Result<&str, AssetError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(AssetError::InvalidReference(name.to_string()));
    }
    Ok(name)
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// File payload handed to the store.
#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The store had nothing under that filename. Callers treat this as done.
    NotFound,
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Asset store error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("S3 error: {0}")]
    S3(String),

    #[error("Invalid asset store endpoint: {0}")]
    Endpoint(String),

    #[error("Invalid asset reference: '{0}'")]
    InvalidReference(String),

    #[error("Unknown asset kind: '{0}'")]
    UnknownKind(String),
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn upload(&self, kind: AssetKind, upload: AssetUpload) -> Result<AssetRef, AssetError>;

    async fn delete(&self, kind: AssetKind, filename: &str) -> Result<DeleteOutcome, AssetError>;
}
