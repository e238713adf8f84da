//! Resume Record Service client.
//!
//! All record persistence, pagination, search and statistics live in the
//! external record service. Reads are served through `CachedReads`; every
//! mutation invalidates the cached projections.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::Caller;
use crate::models::{ListFilter, Resume, ResumePage, ResumeStats, ResumeSubmission};

pub mod cache;
pub mod handlers;
pub mod http;
pub mod redis_cache;

pub use cache::{CachedReads, MemoryQueryCache, QueryCache, QueryTag, MUTATION_TAGS};
pub use http::HttpRecordService;
pub use redis_cache::RedisQueryCache;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Record service error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Resume not found: {0}")]
    NotFound(String),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[async_trait]
pub trait RecordService: Send + Sync {
    async fn list(&self, filter: &ListFilter) -> Result<ResumePage, RecordError>;

    async fn list_all(&self) -> Result<Vec<Resume>, RecordError>;

    async fn search(&self, query: &str, page: u32, limit: u32) -> Result<ResumePage, RecordError>;

    async fn stats(&self) -> Result<ResumeStats, RecordError>;

    async fn get_by_id(&self, id: &str) -> Result<Resume, RecordError>;

    /// The caller's own resume, if they have submitted one.
    async fn get_mine(&self) -> Result<Option<Resume>, RecordError>;

    async fn create(&self, data: &ResumeSubmission) -> Result<Resume, RecordError>;

    async fn update_mine(&self, data: &ResumeSubmission) -> Result<Resume, RecordError>;

    async fn update_by_id(&self, id: &str, data: &ResumeSubmission) -> Result<Resume, RecordError>;

    async fn delete_by_id(&self, id: &str) -> Result<(), RecordError>;

    async fn delete_mine(&self) -> Result<(), RecordError>;

    async fn toggle_hire_status(&self, id: &str) -> Result<Resume, RecordError>;
}

/// Hands out a record client acting on behalf of a specific caller.
pub trait RecordServiceProvider: Send + Sync {
    fn for_caller(&self, caller: &Caller) -> Arc<dyn RecordService>;
}
