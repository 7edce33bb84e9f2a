//! Project and entry rows. Enum-like columns are plain `TEXT` and are mapped onto the
//! store's sum types here.

use chrono::{DateTime, Utc};
use diary_store::{Entry, EntryType, Mood, Project, ProjectStatus};
use sqlx::FromRow;
use uuid::Uuid;

pub const PROJECT_COLUMNS: &str =
    "id, user_id, name, description, status, tech_stack, repo_url, created_at, updated_at";

pub const ENTRY_COLUMNS: &str = "id, user_id, title, content, entry_type, mood, tags, pinned, \
     project_id, created_at, updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub tech_stack: Vec<String>,
    pub repo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            description: row.description,
            status: ProjectStatus::from(row.status),
            tech_stack: row.tech_stack,
            repo_url: row.repo_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct EntryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub entry_type: String,
    pub mood: Option<String>,
    pub tags: Vec<String>,
    pub pinned: bool,
    pub project_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EntryRow> for Entry {
    fn from(row: EntryRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            content: row.content,
            entry_type: EntryType::from(row.entry_type),
            mood: row.mood.map(Mood::from),
            tags: row.tags,
            pinned: row.pinned,
            project_id: row.project_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
