//! # Journal: owner-scoped operations over an abstract store
//!
//! [`Journal`] holds all of the journal's rules; [`JournalStore`] is the narrow storage
//! interface it drives. The same service runs against Postgres in production
//! (`diary_api::db::PgStore`) and against [`crate::MemoryStore`] in tests.
//!
//! ## [`JournalStore`] trait
//!
//! Every project/entry method takes the owner id and filters on `(id, owner)`. Updates
//! and deletes report whether a row matched, so a record owned by someone else is
//! indistinguishable from a missing one.
//!
//! ## Write path
//!
//! | Method | Semantics |
//! |--------|-----------|
//! | [`create_project`](Journal::create_project) | `name` required; status `active` and empty tech stack by default. |
//! | [`update_project`](Journal::update_project) | Full replace: unsent fields fall back to their defaults. |
//! | [`delete_project`](Journal::delete_project) | Deletes, then unlinks the owner's entries pointing at it. The two steps are not atomic. |
//! | [`create_entry`](Journal::create_entry) | `title` and `content` required; a non-empty `project_id` must parse. |
//! | [`update_entry`](Journal::update_entry) | Partial: only fields present in the [`EntryPatch`] change. |
//! | [`delete_entry`](Journal::delete_entry) | Plain delete. |
//!
//! Write paths reject a malformed path id with [`JournalError::InvalidId`] before
//! touching the store. Read paths treat a malformed id as "no such record".

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::JournalError;
use crate::input::{parse_id, EntryPatch, NewEntry, ProjectInput};
use crate::models::{Entry, EntryChanges, Project, ProjectFields, ProjectOption, User};
use crate::patch::Patch;
use crate::record::{EntryRecord, ProjectRecord};

pub type Result<T, E = JournalError> = std::result::Result<T, E>;

/// Async storage interface for users, projects and entries.
pub trait JournalStore: Send + Sync {
    fn insert_user(&self, user: &User) -> impl Future<Output = Result<()>> + Send;

    /// Look up a user by normalized email.
    fn find_user_by_email(&self, email: &str) -> impl Future<Output = Result<Option<User>>> + Send;

    fn insert_project(&self, project: &Project) -> impl Future<Output = Result<()>> + Send;

    /// Overwrite the replaceable fields. Returns `false` if nothing matched.
    fn replace_project(
        &self,
        owner: Uuid,
        id: Uuid,
        fields: &ProjectFields,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<bool>> + Send;

    fn delete_project(&self, owner: Uuid, id: Uuid) -> impl Future<Output = Result<bool>> + Send;

    /// Most recently updated first.
    fn list_projects(&self, owner: Uuid) -> impl Future<Output = Result<Vec<Project>>> + Send;

    fn find_project(
        &self,
        owner: Uuid,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Project>>> + Send;

    /// `{id, name}` pairs ordered by name.
    fn project_options(
        &self,
        owner: Uuid,
    ) -> impl Future<Output = Result<Vec<ProjectOption>>> + Send;

    fn insert_entry(&self, entry: &Entry) -> impl Future<Output = Result<()>> + Send;

    /// Apply the present changes. Returns `false` if nothing matched.
    fn update_entry(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: &EntryChanges,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<bool>> + Send;

    fn delete_entry(&self, owner: Uuid, id: Uuid) -> impl Future<Output = Result<bool>> + Send;

    /// Clear `project_id` on the owner's entries linked to `project_id`; returns how many.
    fn unlink_entries(
        &self,
        owner: Uuid,
        project_id: Uuid,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<u64>> + Send;

    /// Newest first.
    fn list_entries(&self, owner: Uuid) -> impl Future<Output = Result<Vec<Entry>>> + Send;

    /// Newest first.
    fn list_project_entries(
        &self,
        owner: Uuid,
        project_id: Uuid,
    ) -> impl Future<Output = Result<Vec<Entry>>> + Send;

    fn find_entry(&self, owner: Uuid, id: Uuid)
        -> impl Future<Output = Result<Option<Entry>>> + Send;
}

/// Outcome of the entry unlink that follows a project deletion.
#[derive(Debug)]
pub enum Cascade {
    Unlinked(u64),
    /// The project is gone but its entries still reference it.
    Failed(JournalError),
}

/// The journal service.
pub struct Journal<S: JournalStore> {
    store: S,
}

impl<S: JournalStore> Journal<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn create_project(&self, owner: Uuid, input: ProjectInput) -> Result<Uuid> {
        let fields = input.into_fields();
        if fields.name.is_empty() {
            return Err(JournalError::validation("Name is required"));
        }

        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            user_id: owner,
            name: fields.name,
            description: fields.description,
            status: fields.status,
            tech_stack: fields.tech_stack,
            repo_url: fields.repo_url,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_project(&project).await?;
        Ok(project.id)
    }

    pub async fn update_project(&self, owner: Uuid, id: &str, input: ProjectInput) -> Result<()> {
        let id = parse_id(id).ok_or(JournalError::InvalidId)?;
        let fields = input.into_fields();

        if !self
            .store
            .replace_project(owner, id, &fields, Utc::now())
            .await?
        {
            return Err(JournalError::NotFound);
        }
        Ok(())
    }

    pub async fn delete_project(&self, owner: Uuid, id: &str) -> Result<Cascade> {
        let id = parse_id(id).ok_or(JournalError::InvalidId)?;

        if !self.store.delete_project(owner, id).await? {
            return Err(JournalError::NotFound);
        }

        Ok(match self.store.unlink_entries(owner, id, Utc::now()).await {
            Ok(count) => Cascade::Unlinked(count),
            Err(err) => Cascade::Failed(err),
        })
    }

    pub async fn list_projects(&self, owner: Uuid) -> Result<Vec<ProjectRecord>> {
        let projects = self.store.list_projects(owner).await?;
        Ok(projects.into_iter().map(ProjectRecord::from).collect())
    }

    pub async fn get_project(&self, owner: Uuid, id: &str) -> Result<Option<ProjectRecord>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let project = self.store.find_project(owner, id).await?;
        Ok(project.map(ProjectRecord::from))
    }

    pub async fn project_options(&self, owner: Uuid) -> Result<Vec<ProjectOption>> {
        self.store.project_options(owner).await
    }

    pub async fn create_entry(&self, owner: Uuid, input: NewEntry) -> Result<Uuid> {
        let title = input.title.filter(|t| !t.is_empty());
        let content = input.content.filter(|c| !c.is_empty());
        let (Some(title), Some(content)) = (title, content) else {
            return Err(JournalError::validation("Title and content are required"));
        };
        let project_id = parse_project_ref(input.project_id.as_deref())?;

        let now = Utc::now();
        let entry = Entry {
            id: Uuid::new_v4(),
            user_id: owner,
            title,
            content,
            entry_type: input.entry_type.unwrap_or_default(),
            mood: input.mood,
            tags: input.tags.unwrap_or_default(),
            pinned: input.pinned.unwrap_or(false),
            project_id,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_entry(&entry).await?;
        Ok(entry.id)
    }

    pub async fn update_entry(&self, owner: Uuid, id: &str, patch: EntryPatch) -> Result<()> {
        let id = parse_id(id).ok_or(JournalError::InvalidId)?;
        let changes = resolve_patch(patch)?;

        if !self
            .store
            .update_entry(owner, id, &changes, Utc::now())
            .await?
        {
            return Err(JournalError::NotFound);
        }
        Ok(())
    }

    pub async fn delete_entry(&self, owner: Uuid, id: &str) -> Result<()> {
        let id = parse_id(id).ok_or(JournalError::InvalidId)?;

        if !self.store.delete_entry(owner, id).await? {
            return Err(JournalError::NotFound);
        }
        Ok(())
    }

    pub async fn list_entries(&self, owner: Uuid) -> Result<Vec<EntryRecord>> {
        let entries = self.store.list_entries(owner).await?;
        Ok(entries.into_iter().map(EntryRecord::from).collect())
    }

    /// Entries linked to `project_id`. A malformed id yields an empty list.
    pub async fn list_project_entries(
        &self,
        owner: Uuid,
        project_id: &str,
    ) -> Result<Vec<EntryRecord>> {
        let Some(project_id) = parse_id(project_id) else {
            return Ok(Vec::new());
        };
        let entries = self.store.list_project_entries(owner, project_id).await?;
        Ok(entries.into_iter().map(EntryRecord::from).collect())
    }

    pub async fn get_entry(&self, owner: Uuid, id: &str) -> Result<Option<EntryRecord>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let entry = self.store.find_entry(owner, id).await?;
        Ok(entry.map(EntryRecord::from))
    }
}

/// An absent or empty reference means "no project"; anything else must parse.
fn parse_project_ref(raw: Option<&str>) -> Result<Option<Uuid>> {
    match raw {
        None | Some("") => Ok(None),
        Some(raw) => parse_id(raw)
            .map(Some)
            .ok_or(JournalError::InvalidProjectId),
    }
}

/// Title and content are non-nullable; any sent string, empty included, is stored.
fn required_text(patch: Patch<String>) -> Result<Option<String>> {
    match patch {
        Patch::Unset => Ok(None),
        Patch::Value(text) => Ok(Some(text)),
        Patch::Null => Err(JournalError::validation("Title and content cannot be null")),
    }
}

fn resolve_patch(patch: EntryPatch) -> Result<EntryChanges> {
    let project_id = match patch.project_id {
        Patch::Unset => Patch::Unset,
        Patch::Null => Patch::Null,
        Patch::Value(raw) => parse_project_ref(Some(&raw))?.into(),
    };

    Ok(EntryChanges {
        title: required_text(patch.title)?,
        content: required_text(patch.content)?,
        entry_type: patch.entry_type.into_option().map(Option::unwrap_or_default),
        mood: patch.mood,
        tags: patch.tags.into_option().map(Option::unwrap_or_default),
        pinned: patch.pinned.into_option().map(|p| p.unwrap_or(false)),
        project_id,
    })
}
