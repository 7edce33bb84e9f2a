use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::JournalError;
use crate::models::{Entry, EntryChanges, Project, ProjectFields, ProjectOption, User};
use crate::repo::{JournalStore, Result};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    projects: Vec<Project>,
    entries: Vec<Entry>,
}

/// In-memory JournalStore for tests and local runs without a database.
///
/// Rows are kept in insertion order; listings sort newest first and break timestamp
/// ties by reverse insertion order.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn newest_first<T>(mut rows: Vec<T>, key: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    rows.reverse();
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
    rows
}

impl JournalStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        let mut tables = self.lock();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(JournalError::Conflict(
                "An account with this email already exists.".to_string(),
            ));
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_project(&self, project: &Project) -> Result<()> {
        self.lock().projects.push(project.clone());
        Ok(())
    }

    async fn replace_project(
        &self,
        owner: Uuid,
        id: Uuid,
        fields: &ProjectFields,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let mut tables = self.lock();
        let Some(project) = tables
            .projects
            .iter_mut()
            .find(|p| p.id == id && p.user_id == owner)
        else {
            return Ok(false);
        };
        project.apply(fields.clone(), now);
        Ok(true)
    }

    async fn delete_project(&self, owner: Uuid, id: Uuid) -> Result<bool> {
        let mut tables = self.lock();
        let before = tables.projects.len();
        tables
            .projects
            .retain(|p| !(p.id == id && p.user_id == owner));
        Ok(tables.projects.len() != before)
    }

    async fn list_projects(&self, owner: Uuid) -> Result<Vec<Project>> {
        let projects = self
            .lock()
            .projects
            .iter()
            .filter(|p| p.user_id == owner)
            .cloned()
            .collect();
        Ok(newest_first(projects, |p| p.updated_at))
    }

    async fn find_project(&self, owner: Uuid, id: Uuid) -> Result<Option<Project>> {
        Ok(self
            .lock()
            .projects
            .iter()
            .find(|p| p.id == id && p.user_id == owner)
            .cloned())
    }

    async fn project_options(&self, owner: Uuid) -> Result<Vec<ProjectOption>> {
        let mut options: Vec<ProjectOption> = self
            .lock()
            .projects
            .iter()
            .filter(|p| p.user_id == owner)
            .map(|p| ProjectOption {
                id: p.id.to_string(),
                name: p.name.clone(),
            })
            .collect();
        options.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(options)
    }

    async fn insert_entry(&self, entry: &Entry) -> Result<()> {
        self.lock().entries.push(entry.clone());
        Ok(())
    }

    async fn update_entry(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: &EntryChanges,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let mut tables = self.lock();
        let Some(entry) = tables
            .entries
            .iter_mut()
            .find(|e| e.id == id && e.user_id == owner)
        else {
            return Ok(false);
        };
        entry.apply(changes.clone(), now);
        Ok(true)
    }

    async fn delete_entry(&self, owner: Uuid, id: Uuid) -> Result<bool> {
        let mut tables = self.lock();
        let before = tables.entries.len();
        tables
            .entries
            .retain(|e| !(e.id == id && e.user_id == owner));
        Ok(tables.entries.len() != before)
    }

    async fn unlink_entries(
        &self,
        owner: Uuid,
        project_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64> {
        let mut count = 0;
        for entry in self
            .lock()
            .entries
            .iter_mut()
            .filter(|e| e.user_id == owner && e.project_id == Some(project_id))
        {
            entry.project_id = None;
            entry.updated_at = now;
            count += 1;
        }
        Ok(count)
    }

    async fn list_entries(&self, owner: Uuid) -> Result<Vec<Entry>> {
        let entries = self
            .lock()
            .entries
            .iter()
            .filter(|e| e.user_id == owner)
            .cloned()
            .collect();
        Ok(newest_first(entries, |e| e.created_at))
    }

    async fn list_project_entries(&self, owner: Uuid, project_id: Uuid) -> Result<Vec<Entry>> {
        let entries = self
            .lock()
            .entries
            .iter()
            .filter(|e| e.user_id == owner && e.project_id == Some(project_id))
            .cloned()
            .collect();
        Ok(newest_first(entries, |e| e.created_at))
    }

    async fn find_entry(&self, owner: Uuid, id: Uuid) -> Result<Option<Entry>> {
        Ok(self
            .lock()
            .entries
            .iter()
            .find(|e| e.id == id && e.user_id == owner)
            .cloned())
    }
}
