use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};

use super::{RecordError, RecordService, RecordServiceProvider};
use crate::auth::Caller;
use crate::models::{ListFilter, Resume, ResumePage, ResumeStats, ResumeSubmission};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: String,
}

/// REST client for the record service rooted at `{base}/resumes`.
#[derive(Clone)]
pub struct HttpRecordService {
    client: Client,
    base: String,
    token: Option<String>,
}

impl HttpRecordService {
    pub fn new(service_url: &str, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            base: format!("{}/resumes", service_url.trim_end_matches('/')),
            token: None,
        }
    }

    /// Clone of this client that forwards the given bearer token.
    pub fn with_token(&self, token: Option<&str>) -> Self {
        Self {
            client: self.client.clone(),
            base: self.base.clone(),
            token: token.map(str::to_string),
        }
    }

    fn url(&self, path: &str) -> String {
        if path.is_empty() {
            self.base.clone()
        } else {
            format!("{}/{}", self.base, path)
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RecordError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        if status == StatusCode::NOT_FOUND {
            return Err(RecordError::NotFound(message));
        }
        Err(RecordError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RecordError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl RecordService for HttpRecordService {
    async fn list(&self, filter: &ListFilter) -> Result<ResumePage, RecordError> {
        self.send_json(self.client.get(self.url("")).query(filter)).await
    }

    async fn list_all(&self) -> Result<Vec<Resume>, RecordError> {
        self.send_json(self.client.get(self.url("all"))).await
    }

    async fn search(&self, query: &str, page: u32, limit: u32) -> Result<ResumePage, RecordError> {
        let request = self
            .client
            .get(self.url("search"))
            .query(&[
                ("q", query.to_string()),
                ("page", page.to_string()),
                ("limit", limit.to_string()),
            ]);
        self.send_json(request).await
    }

    async fn stats(&self) -> Result<ResumeStats, RecordError> {
        self.send_json(self.client.get(self.url("stats"))).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Resume, RecordError> {
        self.send_json(self.client.get(self.url(id)))
            .await
            .map_err(|e| match e {
                RecordError::NotFound(_) => RecordError::NotFound(id.to_string()),
                other => other,
            })
    }

    async fn get_mine(&self) -> Result<Option<Resume>, RecordError> {
        match self.send_json(self.client.get(self.url("me"))).await {
            Ok(resume) => Ok(Some(resume)),
            Err(RecordError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create(&self, data: &ResumeSubmission) -> Result<Resume, RecordError> {
        self.send_json(self.client.post(self.url("")).json(data)).await
    }

    async fn update_mine(&self, data: &ResumeSubmission) -> Result<Resume, RecordError> {
        self.send_json(self.client.put(self.url("me")).json(data)).await
    }

    async fn update_by_id(&self, id: &str, data: &ResumeSubmission) -> Result<Resume, RecordError> {
        self.send_json(self.client.put(self.url(id)).json(data)).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), RecordError> {
        self.send(self.client.delete(self.url(id))).await?;
        Ok(())
    }

    async fn delete_mine(&self) -> Result<(), RecordError> {
        self.send(self.client.delete(self.url("me"))).await?;
        Ok(())
    }

    async fn toggle_hire_status(&self, id: &str) -> Result<Resume, RecordError> {
        let path = format!("{id}/hire-status");
        self.send_json(self.client.patch(self.url(&path))).await
    }
}

impl RecordServiceProvider for HttpRecordService {
    fn for_caller(&self, caller: &Caller) -> Arc<dyn RecordService> {
        Arc::new(self.with_token(caller.token()))
    }
}
