//! Tagged read cache for record service projections.
//!
//! Each read projection is stored under a `QueryTag`. Mutations drop whole
//! tags rather than individual keys, so any read issued after an
//! invalidation goes back to the record service.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::{RecordError, RecordService};
use crate::auth::Caller;
use crate::models::{ListFilter, Resume, ResumePage, ResumeStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryTag {
    List,
    ListAll,
    Search,
    Stats,
    ById,
    Mine,
}

impl QueryTag {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryTag::List => "list",
            QueryTag::ListAll => "list-all",
            QueryTag::Search => "search",
            QueryTag::Stats => "stats",
            QueryTag::ById => "by-id",
            QueryTag::Mine => "mine",
        }
    }
}

impl fmt::Display for QueryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every projection a resume mutation can affect.
pub const MUTATION_TAGS: [QueryTag; 6] = [
    QueryTag::List,
    QueryTag::ListAll,
    QueryTag::Search,
    QueryTag::Stats,
    QueryTag::ById,
    QueryTag::Mine,
];

/// Cache failures never fail a read; implementations log and report a miss.
#[async_trait]
pub trait QueryCache: Send + Sync {
    async fn get(&self, tag: QueryTag, key: &str) -> Option<Value>;

    async fn put(&self, tag: QueryTag, key: &str, value: Value);

    async fn invalidate(&self, tags: &[QueryTag]);
}

/// In-process cache used when no Redis URL is configured.
pub struct MemoryQueryCache {
    ttl: Duration,
    entries: RwLock<HashMap<QueryTag, HashMap<String, (Instant, Value)>>>,
}

impl MemoryQueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl QueryCache for MemoryQueryCache {
    async fn get(&self, tag: QueryTag, key: &str) -> Option<Value> {
        let entries = self.entries.read().await;
        let (stored_at, value) = entries.get(&tag)?.get(key)?;
        if stored_at.elapsed() >= self.ttl {
            return None;
        }
        Some(value.clone())
    }

    async fn put(&self, tag: QueryTag, key: &str, value: Value) {
        let mut entries = self.entries.write().await;
        let bucket = entries.entry(tag).or_default();
        let ttl = self.ttl;
        bucket.retain(|_, (stored_at, _)| stored_at.elapsed() < ttl);
        bucket.insert(key.to_string(), (Instant::now(), value));
    }

    async fn invalidate(&self, tags: &[QueryTag]) {
        let mut entries = self.entries.write().await;
        for tag in tags {
            entries.remove(tag);
        }
    }
}

/// Read path for the presentation layer: every projection goes through the cache.
///
/// Keys are scoped to the caller, since the record service may answer the
/// same query differently per token. Invalidation stays tag-wide.
pub struct CachedReads {
    records: Arc<dyn RecordService>,
    cache: Arc<dyn QueryCache>,
    scope: String,
}

impl CachedReads {
    pub fn new(records: Arc<dyn RecordService>, cache: Arc<dyn QueryCache>, caller: &Caller) -> Self {
        Self {
            records,
            cache,
            scope: caller.scope(),
        }
    }

    async fn cached<T, F, Fut>(&self, tag: QueryTag, key: String, fetch: F) -> Result<T, RecordError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, RecordError>>,
    {
        let key = format!("{}:{key}", self.scope);
        if let Some(value) = self.cache.get(tag, &key).await {
            match serde_json::from_value(value) {
                Ok(hit) => {
                    debug!("Cache hit: {tag}/{key}");
                    return Ok(hit);
                }
                Err(e) => warn!("Discarding unreadable cache entry {tag}/{key}: {e}"),
            }
        }

        let fresh = fetch().await?;
        match serde_json::to_value(&fresh) {
            Ok(value) => self.cache.put(tag, &key, value).await,
            Err(e) => warn!("Could not cache {tag}/{key}: {e}"),
        }
        Ok(fresh)
    }

    pub async fn list(&self, filter: &ListFilter) -> Result<ResumePage, RecordError> {
        let key = serde_json::to_string(filter)?;
        self.cached(QueryTag::List, key, || self.records.list(filter)).await
    }

    pub async fn list_all(&self) -> Result<Vec<Resume>, RecordError> {
        self.cached(QueryTag::ListAll, "all".to_string(), || self.records.list_all()).await
    }

    pub async fn search(&self, query: &str, page: u32, limit: u32) -> Result<ResumePage, RecordError> {
        let key = format!("{query}|{page}|{limit}");
        self.cached(QueryTag::Search, key, || self.records.search(query, page, limit)).await
    }

    pub async fn stats(&self) -> Result<ResumeStats, RecordError> {
        self.cached(QueryTag::Stats, "stats".to_string(), || self.records.stats()).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Resume, RecordError> {
        self.cached(QueryTag::ById, id.to_string(), || self.records.get_by_id(id)).await
    }

    pub async fn get_mine(&self) -> Result<Option<Resume>, RecordError> {
        self.cached(QueryTag::Mine, "me".to_string(), || self.records.get_mine()).await
    }
}
