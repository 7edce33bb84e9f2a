//! # User rows and their client-safe projection
//!
//! ## [`UserRow`]
//!
//! The complete row from the `users` table, loaded with [`sqlx::FromRow`]:
//!
//! - `id`: primary key (`UUID v4`).
//! - `email`: trimmed, lower-cased, unique.
//! - `password_hash`: Argon2 PHC string; `NULL` means the account cannot log in.
//! - `created_at` / `updated_at`: audit timestamps.
//!
//! It converts into the storage-neutral [`diary_store::User`].
//!
//! ## [`UserInfo`]
//!
//! What the API returns about the signed-in user: id as a string and the email. Never
//! includes the hash.

use chrono::{DateTime, Utc};
use diary_store::User;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::SessionUser;

/// Full user record from the database.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// User information safe to send to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
}

impl From<&SessionUser> for UserInfo {
    fn from(user: &SessionUser) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
        }
    }
}
