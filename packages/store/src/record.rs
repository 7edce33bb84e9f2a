//! # Client-facing records
//!
//! The serialization boundary. Stored models are converted here before they leave the
//! service: identifiers become strings, timestamps become RFC 3339 UTC strings with
//! millisecond precision, optional fields are explicit `null` and lists are never
//! missing.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Entry, EntryType, Mood, Project, ProjectStatus};

/// Format a timestamp the way every record exposes it: `2024-05-01T12:00:00.000Z`.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub tech_stack: Vec<String>,
    pub repo_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Project> for ProjectRecord {
    fn from(project: Project) -> Self {
        Self {
            id: project.id.to_string(),
            name: project.name,
            description: project.description,
            status: project.status,
            tech_stack: project.tech_stack,
            repo_url: project.repo_url,
            created_at: format_timestamp(&project.created_at),
            updated_at: format_timestamp(&project.updated_at),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: String,
    pub title: String,
    pub content: String,
    pub entry_type: EntryType,
    pub mood: Option<Mood>,
    pub tags: Vec<String>,
    pub pinned: bool,
    pub project_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Entry> for EntryRecord {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id.to_string(),
            title: entry.title,
            content: entry.content,
            entry_type: entry.entry_type,
            mood: entry.mood,
            tags: entry.tags,
            pinned: entry.pinned,
            project_id: entry.project_id.map(|id| id.to_string()),
            created_at: format_timestamp(&entry.created_at),
            updated_at: format_timestamp(&entry.updated_at),
        }
    }
}
