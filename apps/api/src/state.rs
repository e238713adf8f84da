use std::sync::Arc;

use crate::assets::AssetStore;
use crate::auth::Caller;
use crate::lifecycle::ResumeLifecycle;
use crate::records::{CachedReads, QueryCache, RecordServiceProvider};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn RecordServiceProvider>,
    /// Either the REST asset endpoints or the S3 bucket, chosen by `ASSET_BACKEND`.
    pub assets: Arc<dyn AssetStore>,
    /// Read cache shared by every caller; `Mine` entries are scoped per caller.
    pub cache: Arc<dyn QueryCache>,
}

impl AppState {
    pub fn reads(&self, caller: &Caller) -> CachedReads {
        CachedReads::new(self.records.for_caller(caller), self.cache.clone(), caller)
    }

    pub fn lifecycle(&self, caller: &Caller) -> ResumeLifecycle {
        ResumeLifecycle::new(
            self.assets.clone(),
            self.records.for_caller(caller),
            self.cache.clone(),
        )
    }
}
