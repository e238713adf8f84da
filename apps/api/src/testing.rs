//! Recording fakes for the record service and asset store.
//!
//! Both fakes can share one `CallLog` so tests can assert on the exact order
//! of remote calls across the two collaborators.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::assets::{AssetError, AssetKind, AssetRef, AssetStore, AssetUpload, DeleteOutcome};
use crate::auth::Caller;
use crate::models::{
    CategoryRef, ListFilter, Resume, ResumePage, ResumeStats, ResumeSubmission,
};
use crate::records::{RecordError, RecordService, RecordServiceProvider};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    ListAll,
    Search(String),
    Stats,
    GetById(String),
    GetMine,
    Create,
    UpdateMine,
    UpdateById(String),
    DeleteById(String),
    DeleteMine,
    ToggleHire(String),
    Upload(AssetKind),
    DeleteAsset(AssetKind, String),
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

pub fn resume(id: &str, photo: Option<&str>, file: Option<&str>) -> Resume {
    Resume {
        id: id.to_string(),
        full_name: format!("Candidate {id}"),
        job_title: "Engineer".to_string(),
        category: CategoryRef::Id("c1".to_string()),
        is_hired: false,
        photo: photo.map(AssetRef::new),
        file: file.map(AssetRef::new),
        user: None,
        created_at: None,
    }
}

pub fn upload(name: &str) -> AssetUpload {
    AssetUpload {
        file_name: name.to_string(),
        content_type: "application/octet-stream".to_string(),
        bytes: bytes::Bytes::from_static(b"binary"),
    }
}

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn serve_stub(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// HTTP client for stub servers; bypasses any proxy configured in the environment.
pub fn direct_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

fn server_error(what: &str) -> RecordError {
    RecordError::Api {
        status: 500,
        message: format!("{what} failed"),
    }
}

#[derive(Default)]
pub struct FakeRecords {
    log: CallLog,
    resumes: Mutex<Vec<Resume>>,
    mine: Mutex<Option<String>>,
    failing_deletes: HashSet<String>,
    failing_writes: bool,
    next_id: Mutex<u32>,
}

impl FakeRecords {
    pub fn with(resumes: Vec<Resume>) -> Self {
        Self {
            resumes: Mutex::new(resumes),
            ..Self::default()
        }
    }

    pub fn sharing(mut self, log: &CallLog) -> Self {
        self.log = log.clone();
        self
    }

    pub fn with_mine(self, id: &str) -> Self {
        *self.mine.lock().unwrap() = Some(id.to_string());
        self
    }

    pub fn failing_deletes(mut self, ids: &[&str]) -> Self {
        self.failing_deletes = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.failing_writes = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.lock().unwrap().clone()
    }

    pub fn stored(&self) -> Vec<Resume> {
        self.resumes.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.log.lock().unwrap().push(call);
    }

    fn find(&self, id: &str) -> Result<Resume, RecordError> {
        self.resumes
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| RecordError::NotFound(id.to_string()))
    }

    fn apply(&self, id: &str, data: &ResumeSubmission) -> Result<Resume, RecordError> {
        let mut resumes = self.resumes.lock().unwrap();
        let existing = resumes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| RecordError::NotFound(id.to_string()))?;
        existing.full_name = data.full_name.clone();
        existing.job_title = data.job_title.clone();
        existing.category = CategoryRef::Id(data.category.clone());
        existing.photo = Some(data.photo.clone());
        existing.file = Some(data.file.clone());
        Ok(existing.clone())
    }

    fn remove(&self, id: &str) -> Result<(), RecordError> {
        let mut resumes = self.resumes.lock().unwrap();
        let before = resumes.len();
        resumes.retain(|r| r.id != id);
        if resumes.len() == before {
            return Err(RecordError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn page(&self, resumes: Vec<Resume>) -> ResumePage {
        ResumePage {
            total: resumes.len() as u64,
            current_page: 1,
            total_pages: 1,
            resumes,
        }
    }
}

#[async_trait]
impl RecordService for FakeRecords {
    async fn list(&self, filter: &ListFilter) -> Result<ResumePage, RecordError> {
        self.record(Call::List);
        let resumes = self
            .stored()
            .into_iter()
            .filter(|r| filter.job_title.as_deref().map_or(true, |t| r.job_title == t))
            .collect();
        Ok(self.page(resumes))
    }

    async fn list_all(&self) -> Result<Vec<Resume>, RecordError> {
        self.record(Call::ListAll);
        Ok(self.stored())
    }

    async fn search(&self, query: &str, _page: u32, _limit: u32) -> Result<ResumePage, RecordError> {
        self.record(Call::Search(query.to_string()));
        let resumes = self
            .stored()
            .into_iter()
            .filter(|r| r.full_name.contains(query))
            .collect();
        Ok(self.page(resumes))
    }

    async fn stats(&self) -> Result<ResumeStats, RecordError> {
        self.record(Call::Stats);
        let resumes = self.stored();
        let hired = resumes.iter().filter(|r| r.is_hired).count() as u64;
        let total = resumes.len() as u64;
        Ok(ResumeStats {
            total_resumes: total,
            hired_resumes: hired,
            available_resumes: total - hired,
            hire_rate: if total == 0 { 0.0 } else { hired as f64 * 100.0 / total as f64 },
            recent_resumes: total,
            resumes_by_category: vec![],
            top_job_titles: vec![],
        })
    }

    async fn get_by_id(&self, id: &str) -> Result<Resume, RecordError> {
        self.record(Call::GetById(id.to_string()));
        self.find(id)
    }

    async fn get_mine(&self) -> Result<Option<Resume>, RecordError> {
        self.record(Call::GetMine);
        let mine = self.mine.lock().unwrap().clone();
        Ok(mine.and_then(|id| self.find(&id).ok()))
    }

    async fn create(&self, data: &ResumeSubmission) -> Result<Resume, RecordError> {
        self.record(Call::Create);
        if self.failing_writes {
            return Err(server_error("create"));
        }
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            format!("new-{}", *next)
        };
        let mut created = resume(&id, None, None);
        created.full_name = data.full_name.clone();
        created.job_title = data.job_title.clone();
        created.category = CategoryRef::Id(data.category.clone());
        created.photo = Some(data.photo.clone());
        created.file = Some(data.file.clone());
        self.resumes.lock().unwrap().push(created.clone());
        *self.mine.lock().unwrap() = Some(id);
        Ok(created)
    }

    async fn update_mine(&self, data: &ResumeSubmission) -> Result<Resume, RecordError> {
        self.record(Call::UpdateMine);
        if self.failing_writes {
            return Err(server_error("update"));
        }
        let mine = self.mine.lock().unwrap().clone();
        let id = mine.ok_or_else(|| RecordError::NotFound("me".to_string()))?;
        self.apply(&id, data)
    }

    async fn update_by_id(&self, id: &str, data: &ResumeSubmission) -> Result<Resume, RecordError> {
        self.record(Call::UpdateById(id.to_string()));
        if self.failing_writes {
            return Err(server_error("update"));
        }
        self.apply(id, data)
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), RecordError> {
        self.record(Call::DeleteById(id.to_string()));
        if self.failing_deletes.contains(id) {
            return Err(server_error("delete"));
        }
        self.remove(id)
    }

    async fn delete_mine(&self) -> Result<(), RecordError> {
        self.record(Call::DeleteMine);
        let mine = self.mine.lock().unwrap().take();
        let id = mine.ok_or_else(|| RecordError::NotFound("me".to_string()))?;
        if self.failing_deletes.contains(&id) {
            return Err(server_error("delete"));
        }
        self.remove(&id)
    }

    async fn toggle_hire_status(&self, id: &str) -> Result<Resume, RecordError> {
        self.record(Call::ToggleHire(id.to_string()));
        let mut resumes = self.resumes.lock().unwrap();
        let existing = resumes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| RecordError::NotFound(id.to_string()))?;
        existing.is_hired = !existing.is_hired;
        Ok(existing.clone())
    }
}

/// Hands every caller the same fake.
pub struct SharedRecords(pub Arc<FakeRecords>);

impl RecordServiceProvider for SharedRecords {
    fn for_caller(&self, _caller: &Caller) -> Arc<dyn RecordService> {
        self.0.clone()
    }
}

#[derive(Default)]
pub struct FakeAssets {
    log: CallLog,
    failing_uploads: bool,
    failing_deletes: bool,
    missing: bool,
    uploaded: Mutex<u32>,
}

impl FakeAssets {
    pub fn sharing(mut self, log: &CallLog) -> Self {
        self.log = log.clone();
        self
    }

    pub fn failing_uploads(mut self) -> Self {
        self.failing_uploads = true;
        self
    }

    pub fn failing_deletes(mut self) -> Self {
        self.failing_deletes = true;
        self
    }

    /// Deletes report that nothing was stored under the filename.
    pub fn missing(mut self) -> Self {
        self.missing = true;
        self
    }

}

#[async_trait]
impl AssetStore for FakeAssets {
    async fn upload(&self, kind: AssetKind, upload: AssetUpload) -> Result<AssetRef, AssetError> {
        self.log.lock().unwrap().push(Call::Upload(kind));
        if self.failing_uploads {
            return Err(AssetError::Api {
                status: 503,
                message: "storage unavailable".to_string(),
            });
        }
        let n = {
            let mut uploaded = self.uploaded.lock().unwrap();
            *uploaded += 1;
            *uploaded
        };
        Ok(AssetRef::new(format!(
            "https://assets.test/{kind}/{n}-{}",
            upload.file_name
        )))
    }

    async fn delete(&self, kind: AssetKind, filename: &str) -> Result<DeleteOutcome, AssetError> {
        self.log
            .lock()
            .unwrap()
            .push(Call::DeleteAsset(kind, filename.to_string()));
        if self.failing_deletes {
            return Err(AssetError::Api {
                status: 500,
                message: "delete failed".to_string(),
            });
        }
        if self.missing {
            return Ok(DeleteOutcome::NotFound);
        }
        Ok(DeleteOutcome::Deleted)
    }
}
