use serde::Serialize;

use crate::assets::{AssetKind, AssetRef};

/// A best-effort asset delete that did not go through. The primary action it
/// followed had already succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupFailure {
    pub kind: AssetKind,
    pub reference: AssetRef,
    pub reason: String,
}

/// Result of an orchestrated operation whose primary action succeeded,
/// together with whatever auxiliary cleanup failed along the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome<T> {
    #[serde(rename = "data")]
    pub value: T,
    pub cleanup_failures: Vec<CleanupFailure>,
}

impl<T> Outcome<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            cleanup_failures: Vec::new(),
        }
    }

    pub fn with_failures(value: T, cleanup_failures: Vec<CleanupFailure>) -> Self {
        Self {
            value,
            cleanup_failures,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.cleanup_failures.is_empty()
    }
}
