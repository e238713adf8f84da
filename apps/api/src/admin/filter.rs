use serde::{Deserialize, Serialize};

use crate::models::Resume;

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminFilter {
    /// Matched case-insensitively against full name and job title.
    #[serde(default)]
    pub q: Option<String>,
    /// Category id, or category name when the record carries a populated category.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub hired: Option<bool>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPage {
    pub resumes: Vec<Resume>,
    pub total: usize,
    pub page: u32,
    pub total_pages: u32,
}

impl AdminFilter {
    pub fn matches(&self, resume: &Resume) -> bool {
        if let Some(q) = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let needle = q.to_lowercase();
            let hit = resume.full_name.to_lowercase().contains(&needle)
                || resume.job_title.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            let by_name = resume
                .category
                .name()
                .is_some_and(|name| name.eq_ignore_ascii_case(category));
            if resume.category.id() != category && !by_name {
                return false;
            }
        }
        if let Some(hired) = self.hired {
            if resume.is_hired != hired {
                return false;
            }
        }
        true
    }

    /// Filters the full list and cuts out the requested 1-based page.
    pub fn apply(&self, resumes: Vec<Resume>) -> AdminPage {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let page = self.page.unwrap_or(1).max(1);

        let matching: Vec<Resume> = resumes.into_iter().filter(|r| self.matches(r)).collect();
        let total = matching.len();
        let total_pages = total.div_ceil(limit as usize) as u32;
        let start = (page as usize - 1).saturating_mul(limit as usize);

        AdminPage {
            resumes: matching
                .into_iter()
                .skip(start)
                .take(limit as usize)
                .collect(),
            total,
            page,
            total_pages,
        }
    }
}
