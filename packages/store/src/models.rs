//! # Stored domain models
//!
//! The shapes persisted by a [`crate::JournalStore`]. They are internal: handlers and
//! clients only ever see the records in [`crate::record`].
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`User`] | An account: normalized email plus Argon2 PHC hash. |
//! | [`Project`] | A project owned by one user. |
//! | [`Entry`] | A journal entry owned by one user, optionally linked to a project. |
//! | [`ProjectFields`] | The field set a project update replaces wholesale. |
//! | [`EntryChanges`] | The resolved subset of entry fields a patch touches. |
//!
//! Enum-like columns ([`ProjectStatus`], [`EntryType`], [`Mood`]) are closed sum types
//! with an `Other` variant, so rows written before a variant existed still load.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::patch::Patch;

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            /// A stored value this build does not recognise, kept verbatim.
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Other(value) => value,
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match value.as_str() {
                    $($wire => Self::$variant,)+
                    _ => Self::Other(value),
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::from(value.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(value) => value,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    /// Lifecycle state of a project.
    ProjectStatus {
        Active => "active",
        OnHold => "on-hold",
        Completed => "completed",
        Archived => "archived",
    }
}

impl Default for ProjectStatus {
    fn default() -> Self {
        Self::Active
    }
}

wire_enum! {
    /// Kind of journal entry.
    EntryType {
        Note => "note",
        Plan => "plan",
        Log => "log",
        Idea => "idea",
        Bug => "bug",
        Milestone => "milestone",
    }
}

impl Default for EntryType {
    fn default() -> Self {
        Self::Note
    }
}

wire_enum! {
    Mood {
        Productive => "productive",
        Neutral => "neutral",
        Frustrated => "frustrated",
        Excited => "excited",
        Tired => "tired",
    }
}

/// Account record.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: Uuid,
    /// Trimmed and lower-cased; unique across users.
    pub email: String,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub tech_stack: Vec<String>,
    pub repo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields overwritten by a project update, all at once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectFields {
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub tech_stack: Vec<String>,
    pub repo_url: Option<String>,
}

impl Project {
    pub fn apply(&mut self, fields: ProjectFields, now: DateTime<Utc>) {
        self.name = fields.name;
        self.description = fields.description;
        self.status = fields.status;
        self.tech_stack = fields.tech_stack;
        self.repo_url = fields.repo_url;
        self.updated_at = now;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub entry_type: EntryType,
    pub mood: Option<Mood>,
    pub tags: Vec<String>,
    pub pinned: bool,
    /// Not checked against existing projects; may dangle.
    pub project_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Resolved entry patch: `None` / [`Patch::Unset`] fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntryChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub entry_type: Option<EntryType>,
    pub mood: Patch<Mood>,
    pub tags: Option<Vec<String>>,
    pub pinned: Option<bool>,
    pub project_id: Patch<Uuid>,
}

impl Entry {
    pub fn apply(&mut self, changes: EntryChanges, now: DateTime<Utc>) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(entry_type) = changes.entry_type {
            self.entry_type = entry_type;
        }
        if let Some(mood) = changes.mood.into_option() {
            self.mood = mood;
        }
        if let Some(tags) = changes.tags {
            self.tags = tags;
        }
        if let Some(pinned) = changes.pinned {
            self.pinned = pinned;
        }
        if let Some(project_id) = changes.project_id.into_option() {
            self.project_id = project_id;
        }
        self.updated_at = now;
    }
}

/// Minimal projection used to populate project pickers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectOption {
    pub id: String,
    pub name: String,
}
