use serde::{Deserialize, Serialize};

/// Aggregate dashboard figures, computed by the record service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeStats {
    pub total_resumes: u64,
    pub hired_resumes: u64,
    pub available_resumes: u64,
    pub hire_rate: f64,
    pub recent_resumes: u64,
    #[serde(default)]
    pub resumes_by_category: Vec<CategoryCount>,
    #[serde(default)]
    pub top_job_titles: Vec<JobTitleCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub category_name: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobTitleCount {
    #[serde(rename = "_id")]
    pub job_title: String,
    pub count: u64,
}
