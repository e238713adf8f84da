mod admin;
mod assets;
mod auth;
mod config;
mod errors;
mod lifecycle;
mod models;
mod records;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assets::{AssetStore, HttpAssetStore, S3AssetStore};
use crate::config::{AssetBackend, Config};
use crate::records::{HttpRecordService, MemoryQueryCache, QueryCache, RedisQueryCache};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume portal v{}", env!("CARGO_PKG_VERSION"));

    let records = HttpRecordService::new(&config.record_service_url, config.request_timeout);
    info!("Record service: {}", config.record_service_url);

    let assets = build_asset_store(&config).await;

    let cache: Arc<dyn QueryCache> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            info!("Read cache: redis (ttl {}s)", config.cache_ttl.as_secs());
            Arc::new(RedisQueryCache::new(client, config.cache_ttl))
        }
        None => {
            info!("Read cache: in-memory (ttl {}s)", config.cache_ttl.as_secs());
            Arc::new(MemoryQueryCache::new(config.cache_ttl))
        }
    };

    let state = AppState {
        records: Arc::new(records),
        assets,
        cache,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the portal frontend

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_asset_store(config: &Config) -> Arc<dyn AssetStore> {
    match &config.asset_backend {
        AssetBackend::Http {
            photo_store_url,
            document_store_url,
            token,
        } => {
            info!("Asset store: http (photos {photo_store_url}, documents {document_store_url})");
            Arc::new(HttpAssetStore::new(
                photo_store_url.as_str(),
                document_store_url.as_str(),
                token.clone(),
                config.request_timeout,
            ))
        }
        AssetBackend::S3 {
            bucket,
            endpoint,
            public_url,
            access_key_id,
            secret_access_key,
        } => {
            let client = build_s3_client(endpoint, access_key_id, secret_access_key).await;
            info!("Asset store: s3 bucket {bucket}");
            Arc::new(S3AssetStore::new(client, bucket.as_str(), public_url.as_str()))
        }
    }
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(
    endpoint: &str,
    access_key_id: &str,
    secret_access_key: &str,
) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(access_key_id, secret_access_key, None, None, "portal-static");

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
