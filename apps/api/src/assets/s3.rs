use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use tracing::info;
use uuid::Uuid;

use super::{checked_filename, AssetError, AssetKind, AssetRef, AssetStore, AssetUpload, DeleteOutcome};

/// Asset store writing straight to an S3-compatible bucket (MinIO locally,
/// AWS in production). Kinds are separated by key prefix.
#[derive(Clone)]
pub struct S3AssetStore {
    client: S3Client,
    bucket: String,
    public_base: String,
}

impl S3AssetStore {
    pub fn new(client: S3Client, bucket: impl Into<String>, public_base: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn prefix(kind: AssetKind) -> &'static str {
        match kind {
            AssetKind::Photo => "photos",
            AssetKind::Document => "pdfs",
        }
    }
}

/// Object key for a fresh upload; keeps the original extension so the
/// derived filename stays recognizable.
fn object_key(kind: AssetKind, file_name: &str) -> String {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));
    match extension {
        Some(ext) => format!("{}/{}.{}", S3AssetStore::prefix(kind), Uuid::new_v4(), ext),
        None => format!("{}/{}", S3AssetStore::prefix(kind), Uuid::new_v4()),
    }
}

#[async_trait]
impl AssetStore for S3AssetStore {
    async fn upload(&self, kind: AssetKind, upload: AssetUpload) -> Result<AssetRef, AssetError> {
        let key = object_key(kind, &upload.file_name);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(upload.bytes))
            .content_type(upload.content_type)
            .send()
            .await
            .map_err(|e| AssetError::S3(format!("upload failed: {e}")))?;

        info!("Uploaded {kind} asset to s3://{}/{}", self.bucket, key);
        Ok(AssetRef::new(format!("{}/{}", self.public_base, key)))
    }

    // S3 deletes are idempotent; a missing key still reports success.
    async fn delete(&self, kind: AssetKind, filename: &str) -> Result<DeleteOutcome, AssetError> {
        let key = format!("{}/{}", Self::prefix(kind), checked_filename(filename)?);

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| AssetError::S3(format!("delete failed: {e}")))?;

        info!("Deleted {kind} asset s3://{}/{}", self.bucket, key);
        Ok(DeleteOutcome::Deleted)
    }
}
