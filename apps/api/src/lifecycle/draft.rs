use std::fmt;

use serde::{Deserialize, Serialize};

use crate::assets::{AssetKind, AssetRef};
use crate::models::{Resume, ResumeSubmission};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeFields {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub job_title: String,
    /// Category id.
    #[serde(default)]
    pub category: String,
}

/// The two asset slots a resume owns, each holding at most one reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetSlots {
    #[serde(default)]
    pub photo: Option<AssetRef>,
    #[serde(default, rename = "file")]
    pub document: Option<AssetRef>,
}

impl AssetSlots {
    pub fn get(&self, kind: AssetKind) -> Option<&AssetRef> {
        match kind {
            AssetKind::Photo => self.photo.as_ref(),
            AssetKind::Document => self.document.as_ref(),
        }
    }

    pub fn with(&self, kind: AssetKind, reference: Option<AssetRef>) -> Self {
        let mut next = self.clone();
        match kind {
            AssetKind::Photo => next.photo = reference,
            AssetKind::Document => next.document = reference,
        }
        next
    }
}

/// Client-held resume state between asset uploads and final submission.
/// Never mutated in place: every change produces a new draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    #[serde(flatten)]
    pub fields: ResumeFields,
    #[serde(flatten)]
    pub slots: AssetSlots,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing required fields: {}", self.missing.join(", "))
    }
}

impl std::error::Error for ValidationError {}

impl Draft {
    pub fn new(fields: ResumeFields) -> Self {
        Self {
            fields,
            slots: AssetSlots::default(),
        }
    }

    /// Edit draft seeded from a live record.
    pub fn from_resume(resume: &Resume) -> Self {
        Self {
            fields: ResumeFields {
                full_name: resume.full_name.clone(),
                job_title: resume.job_title.clone(),
                category: resume.category.id().to_string(),
            },
            slots: AssetSlots {
                photo: resume.photo.clone(),
                document: resume.file.clone(),
            },
        }
    }

    pub fn slot(&self, kind: AssetKind) -> Option<&AssetRef> {
        self.slots.get(kind)
    }

    pub fn with_slot(&self, kind: AssetKind, reference: Option<AssetRef>) -> Self {
        Self {
            fields: self.fields.clone(),
            slots: self.slots.with(kind, reference),
        }
    }

    pub fn with_fields(&self, fields: ResumeFields) -> Self {
        Self {
            fields,
            slots: self.slots.clone(),
        }
    }

    /// Checks every required field and both asset slots, reporting all gaps at once.
    pub fn submission(&self) -> Result<ResumeSubmission, ValidationError> {
        let mut missing = Vec::new();
        if self.fields.full_name.trim().is_empty() {
            missing.push("fullName");
        }
        if self.fields.job_title.trim().is_empty() {
            missing.push("jobTitle");
        }
        if self.fields.category.trim().is_empty() {
            missing.push("category");
        }

        if self.slots.photo.is_none() {
            missing.push("photo");
        }
        if self.slots.document.is_none() {
            missing.push("file");
        }

        match (&self.slots.photo, &self.slots.document) {
            (Some(photo), Some(file)) if missing.is_empty() => Ok(ResumeSubmission {
                full_name: self.fields.full_name.trim().to_string(),
                job_title: self.fields.job_title.trim().to_string(),
                category: self.fields.category.trim().to_string(),
                photo: photo.clone(),
                file: file.clone(),
            }),
            _ => Err(ValidationError { missing }),
        }
    }
}
