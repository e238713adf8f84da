use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client as RedisClient, RedisResult};
use serde_json::Value;
use tracing::warn;

use super::cache::{QueryCache, QueryTag};

const KEY_PREFIX: &str = "portal:query";

/// Shared cache for multi-instance deployments. Entries expire on their own;
/// each tag keeps a set of its live keys so invalidation can drop them together.
#[derive(Clone)]
pub struct RedisQueryCache {
    client: RedisClient,
    ttl: Duration,
}

fn entry_key(tag: QueryTag, key: &str) -> String {
    format!("{KEY_PREFIX}:{tag}:{key}")
}

fn tag_index_key(tag: QueryTag) -> String {
    format!("{KEY_PREFIX}:tag:{tag}")
}

/// The tag index lives as long as its newest entry, so it never outlives
/// the keys it points at by more than one TTL.
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

impl RedisQueryCache {
    pub fn new(client: RedisClient, ttl: Duration) -> Self {
        Self { client, ttl }
    }

    async fn connection(&self) -> RedisResult<MultiplexedConnection> {
        self.client.get_multiplexed_async_connection().await
    }

    async fn try_get(&self, tag: QueryTag, key: &str) -> RedisResult<Option<String>> {
        let mut conn = self.connection().await?;
        conn.get(entry_key(tag, key)).await
    }

    async fn try_put(&self, tag: QueryTag, key: &str, payload: String) -> RedisResult<()> {
        let mut conn = self.connection().await?;
        let entry = entry_key(tag, key);
        let index = tag_index_key(tag);
        let ttl = ttl_secs(self.ttl);
        let mut pipe = redis::pipe();
        pipe.atomic()
            .cmd("SET")
            .arg(&entry)
            .arg(payload)
            .arg("EX")
            .arg(ttl)
            .ignore()
            .sadd(&index, &entry)
            .ignore()
            .expire(&index, ttl as i64)
            .ignore();
        pipe.query_async::<_, ()>(&mut conn).await
    }

    async fn try_invalidate(&self, tags: &[QueryTag]) -> RedisResult<()> {
        let mut conn = self.connection().await?;
        for &tag in tags {
            let index = tag_index_key(tag);
            let mut keys: Vec<String> = conn.smembers(&index).await?;
            keys.push(index);
            conn.del::<_, ()>(keys).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl QueryCache for RedisQueryCache {
    async fn get(&self, tag: QueryTag, key: &str) -> Option<Value> {
        match self.try_get(tag, key).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).ok(),
            Ok(None) => None,
            Err(e) => {
                warn!("Redis cache read failed for {tag}/{key}: {e}");
                None
            }
        }
    }

    async fn put(&self, tag: QueryTag, key: &str, value: Value) {
        if let Err(e) = self.try_put(tag, key, value.to_string()).await {
            warn!("Redis cache write failed for {tag}/{key}: {e}");
        }
    }

    async fn invalidate(&self, tags: &[QueryTag]) {
        if let Err(e) = self.try_invalidate(tags).await {
            warn!("Redis cache invalidation failed: {e}");
        }
    }
}
