use std::time::Duration;

use anyhow::{bail, Context, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum AssetBackend {
    /// Separate REST endpoints per asset kind.
    Http {
        photo_store_url: String,
        document_store_url: String,
        token: Option<String>,
    },
    /// S3-compatible bucket (MinIO locally, AWS in production).
    S3 {
        bucket: String,
        endpoint: String,
        public_url: String,
        access_key_id: String,
        secret_access_key: String,
    },
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub record_service_url: String,
    pub asset_backend: AssetBackend,
    pub redis_url: Option<String>,
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let asset_backend = match lookup("ASSET_BACKEND").as_deref().unwrap_or("http") {
            "http" => AssetBackend::Http {
                photo_store_url: require("PHOTO_STORE_URL")?,
                document_store_url: require("DOCUMENT_STORE_URL")?,
                token: lookup("ASSET_STORE_TOKEN").filter(|t| !t.is_empty()),
            },
            "s3" => AssetBackend::S3 {
                bucket: require("S3_BUCKET")?,
                endpoint: require("S3_ENDPOINT")?,
                public_url: require("S3_PUBLIC_URL")?,
                access_key_id: require("AWS_ACCESS_KEY_ID")?,
                secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
            },
            other => bail!("ASSET_BACKEND must be 'http' or 's3', got '{other}'"),
        };

        Ok(Config {
            record_service_url: require("RECORD_SERVICE_URL")?,
            asset_backend,
            redis_url: lookup("REDIS_URL").filter(|v| !v.is_empty()),
            cache_ttl: Duration::from_secs(
                parse_or(&lookup, "CACHE_TTL_SECS", 60).context("CACHE_TTL_SECS must be a number of seconds")?,
            ),
            request_timeout: Duration::from_secs(
                parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)
                    .context("REQUEST_TIMEOUT_SECS must be a number of seconds")?,
            ),
            port: parse_or(&lookup, "PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, T::Err> {
    match lookup(key) {
        Some(raw) => raw.trim().parse(),
        None => Ok(default),
    }
}
