//! Request bodies accepted by the journal service.
//!
//! Project updates reuse [`ProjectInput`] and replace every field; entry updates use
//! [`EntryPatch`], whose [`Patch`] fields only touch what the caller sent.

use serde::Deserialize;
use uuid::Uuid;

use crate::models::{EntryType, Mood, ProjectFields, ProjectStatus};
use crate::patch::Patch;

/// Body of `POST /projects` and `PATCH /projects/{id}`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProjectInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub tech_stack: Option<Vec<String>>,
    pub repo_url: Option<String>,
}

impl ProjectInput {
    /// Fill every absent field with its default.
    pub fn into_fields(self) -> ProjectFields {
        ProjectFields {
            name: self.name.unwrap_or_default(),
            description: self.description,
            status: self.status.unwrap_or_default(),
            tech_stack: self.tech_stack.unwrap_or_default(),
            repo_url: self.repo_url,
        }
    }
}

/// Body of `POST /entries`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewEntry {
    pub title: Option<String>,
    pub content: Option<String>,
    pub entry_type: Option<EntryType>,
    pub mood: Option<Mood>,
    pub tags: Option<Vec<String>>,
    pub pinned: Option<bool>,
    pub project_id: Option<String>,
}

/// Body of `PATCH /entries/{id}`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct EntryPatch {
    pub title: Patch<String>,
    pub content: Patch<String>,
    pub entry_type: Patch<EntryType>,
    pub mood: Patch<Mood>,
    pub tags: Patch<Vec<String>>,
    pub pinned: Patch<bool>,
    pub project_id: Patch<String>,
}

/// Parse a client-supplied identifier. Malformed input yields `None`.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}
