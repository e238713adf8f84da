// Resume lifecycle: keeps a resume record and its two owned assets (photo,
// PDF) consistent across create, replace, update and delete.
// Remote calls run strictly one after another; nothing is retried.

pub mod draft;
pub mod handlers;
pub mod orchestrator;
pub mod outcome;

use thiserror::Error;

use crate::assets::AssetError;
use crate::records::RecordError;

pub use draft::{Draft, ResumeFields, ValidationError};
pub use orchestrator::{DraftRejection, ResumeLifecycle};
pub use outcome::Outcome;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("Bulk delete stopped at '{failed_id}' after {} deletion(s): {source}", .deleted.len())]
    BulkAborted {
        deleted: Vec<String>,
        failed_id: String,
        source: RecordError,
    },
}
