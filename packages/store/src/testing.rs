//! Store doubles for exercising failure paths.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::JournalError;
use crate::memory::MemoryStore;
use crate::models::{Entry, EntryChanges, Project, ProjectFields, ProjectOption, User};
use crate::repo::{JournalStore, Result};

/// A [`MemoryStore`] whose `unlink_entries` always fails.
#[derive(Clone, Debug, Default)]
pub struct UnlinkFailingStore {
    inner: MemoryStore,
}

impl UnlinkFailingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JournalStore for UnlinkFailingStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        self.inner.insert_user(user).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.inner.find_user_by_email(email).await
    }

    async fn insert_project(&self, project: &Project) -> Result<()> {
        self.inner.insert_project(project).await
    }

    async fn replace_project(
        &self,
        owner: Uuid,
        id: Uuid,
        fields: &ProjectFields,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        self.inner.replace_project(owner, id, fields, now).await
    }

    async fn delete_project(&self, owner: Uuid, id: Uuid) -> Result<bool> {
        self.inner.delete_project(owner, id).await
    }

    async fn list_projects(&self, owner: Uuid) -> Result<Vec<Project>> {
        self.inner.list_projects(owner).await
    }

    async fn find_project(&self, owner: Uuid, id: Uuid) -> Result<Option<Project>> {
        self.inner.find_project(owner, id).await
    }

    async fn project_options(&self, owner: Uuid) -> Result<Vec<ProjectOption>> {
        self.inner.project_options(owner).await
    }

    async fn insert_entry(&self, entry: &Entry) -> Result<()> {
        self.inner.insert_entry(entry).await
    }

    async fn update_entry(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: &EntryChanges,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        self.inner.update_entry(owner, id, changes, now).await
    }

    async fn delete_entry(&self, owner: Uuid, id: Uuid) -> Result<bool> {
        self.inner.delete_entry(owner, id).await
    }

    async fn unlink_entries(
        &self,
        _owner: Uuid,
        _project_id: Uuid,
        _now: DateTime<Utc>,
    ) -> Result<u64> {
        Err(JournalError::storage("connection reset during unlink"))
    }

    async fn list_entries(&self, owner: Uuid) -> Result<Vec<Entry>> {
        self.inner.list_entries(owner).await
    }

    async fn list_project_entries(&self, owner: Uuid, project_id: Uuid) -> Result<Vec<Entry>> {
        self.inner.list_project_entries(owner, project_id).await
    }

    async fn find_entry(&self, owner: Uuid, id: Uuid) -> Result<Option<Entry>> {
        self.inner.find_entry(owner, id).await
    }
}
