use chrono::{DateTime, Utc};
use diary_store::{
    Entry, EntryChanges, JournalError, JournalStore, Patch, Project, ProjectFields,
    ProjectOption, User,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::auth::credentials::DUPLICATE_EMAIL;
use crate::models::{EntryRow, ProjectRow, UserRow, ENTRY_COLUMNS, PROJECT_COLUMNS};

type Result<T> = std::result::Result<T, JournalError>;

fn storage(err: sqlx::Error) -> JournalError {
    JournalError::storage(err)
}

/// [`JournalStore`] backed by PostgreSQL.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl JournalStore for PgStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                JournalError::Conflict(DUPLICATE_EMAIL.to_string())
            }
            err => storage(err),
        })?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;
        Ok(row.map(User::from))
    }

    async fn insert_project(&self, project: &Project) -> Result<()> {
        sqlx::query(
            "INSERT INTO projects
                (id, user_id, name, description, status, tech_stack, repo_url, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(project.id)
        .bind(project.user_id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.status.as_str())
        .bind(&project.tech_stack)
        .bind(&project.repo_url)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await
        .map_err(storage)?;
        Ok(())
    }

    async fn replace_project(
        &self,
        owner: Uuid,
        id: Uuid,
        fields: &ProjectFields,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE projects
             SET name = $3, description = $4, status = $5, tech_stack = $6, repo_url = $7,
                 updated_at = $8
             WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.status.as_str())
        .bind(&fields.tech_stack)
        .bind(&fields.repo_url)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(storage)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_project(&self, owner: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_projects(&self, owner: Uuid) -> Result<Vec<Project>> {
        let sql = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE user_id = $1 ORDER BY updated_at DESC"
        );
        let rows: Vec<ProjectRow> = sqlx::query_as(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn find_project(&self, owner: Uuid, id: Uuid) -> Result<Option<Project>> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1 AND user_id = $2");
        let row: Option<ProjectRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;
        Ok(row.map(Project::from))
    }

    async fn project_options(&self, owner: Uuid) -> Result<Vec<ProjectOption>> {
        let rows: Vec<(Uuid, String)> =
            sqlx::query_as("SELECT id, name FROM projects WHERE user_id = $1 ORDER BY name ASC")
                .bind(owner)
                .fetch_all(&self.pool)
                .await
                .map_err(storage)?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| ProjectOption {
                id: id.to_string(),
                name,
            })
            .collect())
    }

    async fn insert_entry(&self, entry: &Entry) -> Result<()> {
        sqlx::query(
            "INSERT INTO entries
                (id, user_id, title, content, entry_type, mood, tags, pinned, project_id,
                 created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(&entry.title)
        .bind(&entry.content)
        .bind(entry.entry_type.as_str())
        .bind(entry.mood.as_ref().map(|m| m.as_str()))
        .bind(&entry.tags)
        .bind(entry.pinned)
        .bind(entry.project_id)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await
        .map_err(storage)?;
        Ok(())
    }

    async fn update_entry(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: &EntryChanges,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let mut query = QueryBuilder::<Postgres>::new("UPDATE entries SET updated_at = ");
        query.push_bind(now);

        if let Some(title) = &changes.title {
            query.push(", title = ").push_bind(title.clone());
        }
        if let Some(content) = &changes.content {
            query.push(", content = ").push_bind(content.clone());
        }
        if let Some(entry_type) = &changes.entry_type {
            query
                .push(", entry_type = ")
                .push_bind(entry_type.as_str().to_string());
        }
        match &changes.mood {
            Patch::Unset => {}
            Patch::Null => {
                query.push(", mood = NULL");
            }
            Patch::Value(mood) => {
                query.push(", mood = ").push_bind(mood.as_str().to_string());
            }
        }
        if let Some(tags) = &changes.tags {
            query.push(", tags = ").push_bind(tags.clone());
        }
        if let Some(pinned) = changes.pinned {
            query.push(", pinned = ").push_bind(pinned);
        }
        match changes.project_id {
            Patch::Unset => {}
            Patch::Null => {
                query.push(", project_id = NULL");
            }
            Patch::Value(project_id) => {
                query.push(", project_id = ").push_bind(project_id);
            }
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND user_id = ")
            .push_bind(owner);

        let result = query
            .build()
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_entry(&self, owner: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(result.rows_affected() > 0)
    }

    async fn unlink_entries(
        &self,
        owner: Uuid,
        project_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE entries SET project_id = NULL, updated_at = $3
             WHERE user_id = $1 AND project_id = $2",
        )
        .bind(owner)
        .bind(project_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(storage)?;
        Ok(result.rows_affected())
    }

    async fn list_entries(&self, owner: Uuid) -> Result<Vec<Entry>> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM entries WHERE user_id = $1 ORDER BY created_at DESC"
        );
        let rows: Vec<EntryRow> = sqlx::query_as(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        Ok(rows.into_iter().map(Entry::from).collect())
    }

    async fn list_project_entries(&self, owner: Uuid, project_id: Uuid) -> Result<Vec<Entry>> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM entries
             WHERE user_id = $1 AND project_id = $2
             ORDER BY created_at DESC"
        );
        let rows: Vec<EntryRow> = sqlx::query_as(&sql)
            .bind(owner)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        Ok(rows.into_iter().map(Entry::from).collect())
    }

    async fn find_entry(&self, owner: Uuid, id: Uuid) -> Result<Option<Entry>> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE id = $1 AND user_id = $2");
        let row: Option<EntryRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;
        Ok(row.map(Entry::from))
    }
}
