use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use super::draft::Draft;
use super::outcome::{CleanupFailure, Outcome};
use super::LifecycleError;
use crate::assets::{AssetKind, AssetRef, AssetStore, AssetUpload};
use crate::models::Resume;
use crate::records::{QueryCache, RecordService, MUTATION_TAGS};

/// A draft operation that failed, carrying the draft as it stands afterwards.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct DraftRejection {
    pub draft: Draft,
    #[source]
    pub error: LifecycleError,
}

/// Composes the asset store and the record service into resume-level
/// operations. The only sanctioned way to change which assets a resume owns.
pub struct ResumeLifecycle {
    assets: Arc<dyn AssetStore>,
    records: Arc<dyn RecordService>,
    cache: Arc<dyn QueryCache>,
}

impl ResumeLifecycle {
    pub fn new(
        assets: Arc<dyn AssetStore>,
        records: Arc<dyn RecordService>,
        cache: Arc<dyn QueryCache>,
    ) -> Self {
        Self {
            assets,
            records,
            cache,
        }
    }

    async fn invalidate_reads(&self) {
        self.cache.invalidate(&MUTATION_TAGS).await;
    }

    /// Best-effort delete of one stored asset. Returns the failure instead of
    /// raising it; an already-missing asset counts as deleted.
    async fn discard_asset(&self, kind: AssetKind, reference: &AssetRef) -> Option<CleanupFailure> {
        let result = match reference.filename() {
            Ok(filename) => self.assets.delete(kind, &filename).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(_) => None,
            Err(e) => {
                warn!("Could not delete {kind} asset {reference}: {e}");
                Some(CleanupFailure {
                    kind,
                    reference: reference.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Photo first, then document. Both are attempted regardless of the other.
    async fn discard_owned_assets(&self, record: &Resume) -> Vec<CleanupFailure> {
        let mut failures = Vec::new();
        if let Some(photo) = &record.photo {
            failures.extend(self.discard_asset(AssetKind::Photo, photo).await);
        }
        if let Some(file) = &record.file {
            failures.extend(self.discard_asset(AssetKind::Document, file).await);
        }
        failures
    }

    /// Submits a complete draft. Rejected locally, with no remote call, unless
    /// every field is filled and both assets are already stored. A failed
    /// create leaves the uploaded assets in place so the draft can be resubmitted.
    pub async fn create_resume(&self, draft: &Draft) -> Result<Resume, LifecycleError> {
        let submission = draft.submission()?;
        let created = self.records.create(&submission).await?;
        self.invalidate_reads().await;
        info!("Created resume {} for '{}'", created.id, created.full_name);
        Ok(created)
    }

    /// Swaps the asset in one slot: delete the current asset (best effort),
    /// then upload the new file. If the upload fails the slot stays empty.
    pub async fn replace_asset(
        &self,
        draft: Draft,
        kind: AssetKind,
        upload: AssetUpload,
    ) -> Result<Outcome<Draft>, DraftRejection> {
        let mut cleanup_failures = Vec::new();
        if let Some(current) = draft.slot(kind) {
            cleanup_failures.extend(self.discard_asset(kind, current).await);
        }
        let cleared = draft.with_slot(kind, None);

        match self.assets.upload(kind, upload).await {
            Ok(reference) => {
                info!("Stored new {kind} asset {reference}");
                Ok(Outcome::with_failures(
                    cleared.with_slot(kind, Some(reference)),
                    cleanup_failures,
                ))
            }
            Err(e) => Err(DraftRejection {
                draft: cleared,
                error: e.into(),
            }),
        }
    }

    /// Empties one slot. The slot is only cleared once the store confirms the
    /// delete; on failure the draft comes back unchanged.
    pub async fn remove_asset(&self, draft: Draft, kind: AssetKind) -> Result<Draft, DraftRejection> {
        let Some(current) = draft.slot(kind) else {
            return Ok(draft);
        };

        let result = match current.filename() {
            Ok(filename) => self.assets.delete(kind, &filename).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(_) => {
                info!("Removed {kind} asset {current}");
                Ok(draft.with_slot(kind, None))
            }
            Err(e) => Err(DraftRejection {
                draft,
                error: e.into(),
            }),
        }
    }

    /// Full update of the caller's own resume.
    pub async fn update_mine(&self, draft: &Draft) -> Result<Resume, LifecycleError> {
        let submission = draft.submission()?;
        let updated = self.records.update_mine(&submission).await?;
        self.invalidate_reads().await;
        info!("Updated own resume {}", updated.id);
        Ok(updated)
    }

    /// Full update of any resume, addressed by id.
    pub async fn update_by_id(&self, id: &str, draft: &Draft) -> Result<Resume, LifecycleError> {
        let submission = draft.submission()?;
        let updated = self.records.update_by_id(id, &submission).await?;
        self.invalidate_reads().await;
        info!("Updated resume {id}");
        Ok(updated)
    }

    /// Deletes the record, then its photo, then its document. Asset cleanup is
    /// skipped entirely if the record delete fails; once the record is gone the
    /// operation succeeds whatever happens to the assets.
    pub async fn delete_resume(&self, record: &Resume) -> Result<Outcome<()>, LifecycleError> {
        self.records.delete_by_id(&record.id).await?;
        self.invalidate_reads().await;
        info!("Deleted resume {}", record.id);

        let failures = self.discard_owned_assets(record).await;
        Ok(Outcome::with_failures((), failures))
    }

    /// Same cascade as `delete_resume`, addressed through the caller alias.
    pub async fn delete_my_resume(&self, record: &Resume) -> Result<Outcome<()>, LifecycleError> {
        self.records.delete_mine().await?;
        self.invalidate_reads().await;
        info!("Deleted own resume {}", record.id);

        let failures = self.discard_owned_assets(record).await;
        Ok(Outcome::with_failures((), failures))
    }

    /// Deletes each id in order using `known` (the admin's full list) to find
    /// the assets to clean up. Stops at the first record delete that fails;
    /// the error lists the ids deleted before it.
    pub async fn bulk_delete_resumes(
        &self,
        ids: &[String],
        known: &[Resume],
    ) -> Result<Outcome<Vec<String>>, LifecycleError> {
        let mut deleted = Vec::with_capacity(ids.len());
        let mut cleanup_failures = Vec::new();

        for id in ids {
            if let Err(source) = self.records.delete_by_id(id).await {
                if !deleted.is_empty() {
                    self.invalidate_reads().await;
                }
                warn!(
                    "Bulk delete aborted at {id} after {} deletion(s): {source}",
                    deleted.len()
                );
                return Err(LifecycleError::BulkAborted {
                    deleted,
                    failed_id: id.clone(),
                    source,
                });
            }
            deleted.push(id.clone());

            match known.iter().find(|r| &r.id == id) {
                Some(record) => cleanup_failures.extend(self.discard_owned_assets(record).await),
                None => warn!("Resume {id} was not in the loaded list; its assets were not cleaned up"),
            }
        }

        if !deleted.is_empty() {
            self.invalidate_reads().await;
        }
        info!("Bulk deleted {} resume(s)", deleted.len());
        Ok(Outcome::with_failures(deleted, cleanup_failures))
    }

    /// Flips the hire flag. Not idempotent.
    pub async fn toggle_hire_status(&self, id: &str) -> Result<Resume, LifecycleError> {
        let updated = self.records.toggle_hire_status(id).await?;
        self.invalidate_reads().await;
        info!("Resume {id} hire status is now {}", updated.is_hired);
        Ok(updated)
    }
}
