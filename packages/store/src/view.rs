//! # Read views
//!
//! Aggregated, filtered shapes for browsing the journal: entries annotated with their
//! linked project, project detail pages and the dashboard summary. Filtering runs over
//! a snapshot already fetched for the owner.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{EntryType, ProjectStatus};
use crate::record::{EntryRecord, ProjectRecord};
use crate::repo::{Journal, JournalStore, Result};

const RECENT_LIMIT: usize = 5;

/// Name of the project an entry points at. The name is empty when the project is gone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectLink {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntryView {
    #[serde(flatten)]
    pub entry: EntryRecord,
    pub project: Option<ProjectLink>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetail {
    pub project: ProjectRecord,
    pub entries: Vec<EntryRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub email: String,
    pub project_count: usize,
    pub entry_count: usize,
    pub active_project_count: usize,
    pub pinned_count: usize,
    pub recent_entries: Vec<EntryView>,
    pub recent_projects: Vec<ProjectRecord>,
}

/// Query string of the entry listing.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EntryQuery {
    pub search: Option<String>,
    /// An entry type, or `all`.
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    pub project: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProjectQuery {
    pub search: Option<String>,
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl EntryQuery {
    pub fn matches(&self, entry: &EntryRecord) -> bool {
        let search = self.search.as_deref().unwrap_or_default().to_lowercase();
        let matches_search = contains(&entry.title, &search)
            || contains(&entry.content, &search)
            || entry.tags.iter().any(|t| contains(t, &search));

        let matches_type = match self.entry_type.as_deref() {
            None | Some("") | Some("all") => true,
            Some(wanted) => entry.entry_type == EntryType::from(wanted),
        };

        matches_search && matches_type
    }
}

impl ProjectQuery {
    pub fn matches(&self, project: &ProjectRecord) -> bool {
        let search = self.search.as_deref().unwrap_or_default().to_lowercase();
        contains(&project.name, &search)
            || project
                .description
                .as_deref()
                .is_some_and(|d| contains(d, &search))
            || project.tech_stack.iter().any(|t| contains(t, &search))
    }
}

/// Stable partition: pinned entries first, each group keeping its order.
pub fn pinned_first(entries: Vec<EntryView>) -> Vec<EntryView> {
    let (mut pinned, unpinned): (Vec<_>, Vec<_>) =
        entries.into_iter().partition(|e| e.entry.pinned);
    pinned.extend(unpinned);
    pinned
}

fn link_projects(
    entries: Vec<EntryRecord>,
    names: &HashMap<String, String>,
) -> Vec<EntryView> {
    entries
        .into_iter()
        .map(|entry| {
            let project = entry.project_id.as_ref().map(|id| ProjectLink {
                id: id.clone(),
                name: names.get(id).cloned().unwrap_or_default(),
            });
            EntryView { entry, project }
        })
        .collect()
}

impl<S: JournalStore> Journal<S> {
    async fn project_names(&self, owner: Uuid) -> Result<HashMap<String, String>> {
        Ok(self
            .project_options(owner)
            .await?
            .into_iter()
            .map(|o| (o.id, o.name))
            .collect())
    }

    pub async fn browse_entries(&self, owner: Uuid, query: &EntryQuery) -> Result<Vec<EntryView>> {
        let entries = match query.project.as_deref() {
            Some(project_id) if !project_id.is_empty() => {
                self.list_project_entries(owner, project_id).await?
            }
            _ => self.list_entries(owner).await?,
        };
        let names = self.project_names(owner).await?;

        let filtered = entries.into_iter().filter(|e| query.matches(e)).collect();
        Ok(pinned_first(link_projects(filtered, &names)))
    }

    pub async fn entry_detail(&self, owner: Uuid, id: &str) -> Result<Option<EntryView>> {
        let Some(entry) = self.get_entry(owner, id).await? else {
            return Ok(None);
        };
        let names = self.project_names(owner).await?;
        Ok(link_projects(vec![entry], &names).pop())
    }

    pub async fn browse_projects(
        &self,
        owner: Uuid,
        query: &ProjectQuery,
    ) -> Result<Vec<ProjectRecord>> {
        let projects = self.list_projects(owner).await?;
        Ok(projects.into_iter().filter(|p| query.matches(p)).collect())
    }

    pub async fn project_detail(&self, owner: Uuid, id: &str) -> Result<Option<ProjectDetail>> {
        let Some(project) = self.get_project(owner, id).await? else {
            return Ok(None);
        };
        let entries = self.list_project_entries(owner, id).await?;
        Ok(Some(ProjectDetail { project, entries }))
    }

    pub async fn dashboard(&self, owner: Uuid, email: &str) -> Result<Dashboard> {
        let projects = self.list_projects(owner).await?;
        let entries = self.list_entries(owner).await?;

        let names = projects
            .iter()
            .map(|p| (p.id.clone(), p.name.clone()))
            .collect();
        let active_project_count = projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Active)
            .count();
        let pinned_count = entries.iter().filter(|e| e.pinned).count();

        Ok(Dashboard {
            email: email.to_string(),
            project_count: projects.len(),
            entry_count: entries.len(),
            active_project_count,
            pinned_count,
            recent_entries: link_projects(
                entries.into_iter().take(RECENT_LIMIT).collect(),
                &names,
            ),
            recent_projects: projects.into_iter().take(RECENT_LIMIT).collect(),
        })
    }
}
