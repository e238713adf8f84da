use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assets::AssetRef;

/// A category as the record service returns it: either a bare id or a
/// populated document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(String),
    Populated {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl CategoryRef {
    pub fn id(&self) -> &str {
        match self {
            CategoryRef::Id(id) => id,
            CategoryRef::Populated { id, .. } => id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            CategoryRef::Id(_) => None,
            CategoryRef::Populated { name, .. } => name.as_deref(),
        }
    }
}

/// A submitted resume record. Ids and timestamps are assigned by the record service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    pub job_title: String,
    pub category: CategoryRef,
    #[serde(default)]
    pub is_hired: bool,
    #[serde(default)]
    pub photo: Option<AssetRef>,
    #[serde(default)]
    pub file: Option<AssetRef>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of a create or full-update call. The owning user is never sent; the
/// record service derives it from the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSubmission {
    pub full_name: String,
    pub job_title: String,
    pub category: String,
    pub photo: AssetRef,
    pub file: AssetRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePage {
    pub resumes: Vec<Resume>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "first_page")]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
}

fn first_page() -> u32 {
    1
}

/// Server-side filter for the public browsing list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}
