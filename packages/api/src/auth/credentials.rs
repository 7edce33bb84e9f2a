//! # Credential authenticator
//!
//! Registration and email/password verification against the users stored in a
//! [`JournalStore`]. Every login failure (unknown email, account without a password,
//! wrong password, unreadable hash) is reported as the same
//! [`ApiError::InvalidCredentials`], so the response never reveals whether an account
//! exists.

use chrono::Utc;
use diary_store::{JournalError, JournalStore, User};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use super::password::{hash_password, verify_password};
use super::session::SessionUser;
use crate::error::ApiError;

/// Minimum password length, in UTF-16 code units.
pub const MIN_PASSWORD_LEN: usize = 8;
pub const DUPLICATE_EMAIL: &str = "An account with this email already exists.";

/// Body of the register and login requests.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Trim and lowercase an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

async fn blocking<T: Send + 'static>(
    f: impl FnOnce() -> Result<T, String> + Send + 'static,
) -> Result<T, ApiError> {
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::Hashing)
}

/// Create an account. Returns the new user id.
pub async fn register<S: JournalStore>(
    store: &S,
    credentials: Credentials,
) -> Result<Uuid, ApiError> {
    let email = normalize_email(&credentials.email);
    if email.is_empty() || credentials.password.encode_utf16().count() < MIN_PASSWORD_LEN {
        return Err(JournalError::validation("Email and password (8+ chars) are required.").into());
    }

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(JournalError::Conflict(DUPLICATE_EMAIL.to_string()).into());
    }

    let password = credentials.password;
    let password_hash = blocking(move || hash_password(&password)).await?;

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        email,
        password_hash: Some(password_hash),
        created_at: now,
        updated_at: now,
    };
    store.insert_user(&user).await?;
    Ok(user.id)
}

/// Check an email/password pair and return the identity to store in the session.
pub async fn authenticate<S: JournalStore>(
    store: &S,
    credentials: Credentials,
) -> Result<SessionUser, ApiError> {
    let email = normalize_email(&credentials.email);
    if email.is_empty() || credentials.password.is_empty() {
        return Err(ApiError::InvalidCredentials);
    }

    let Some(user) = store.find_user_by_email(&email).await? else {
        return Err(ApiError::InvalidCredentials);
    };
    let Some(hash) = user.password_hash else {
        return Err(ApiError::InvalidCredentials);
    };

    let password = credentials.password;
    match blocking(move || verify_password(&password, &hash)).await {
        Ok(true) => Ok(SessionUser {
            id: user.id,
            email: user.email,
        }),
        Ok(false) => Err(ApiError::InvalidCredentials),
        Err(ApiError::Hashing(reason)) => {
            warn!(user_id = %user.id, %reason, "stored password hash is unreadable");
            Err(ApiError::InvalidCredentials)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diary_store::MemoryStore;

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let store = MemoryStore::new();

        let id = register(&store, credentials("  Dev@Example.com ", "hunter22!"))
            .await
            .unwrap();

        let user = authenticate(&store, credentials("dev@example.com", "hunter22!"))
            .await
            .unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.email, "dev@example.com");
    }

    #[tokio::test]
    async fn test_register_validation() {
        let store = MemoryStore::new();

        let err = register(&store, credentials("dev@example.com", "short"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Journal(JournalError::Validation(_))));

        let err = register(&store, credentials("   ", "long enough"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Journal(JournalError::Validation(_))));
    }

    #[tokio::test]
    async fn test_password_length_counts_utf16_units() {
        let store = MemoryStore::new();

        // Four emoji are eight UTF-16 code units.
        register(&store, credentials("emoji@example.com", "\u{1F600}\u{1F600}\u{1F600}\u{1F600}"))
            .await
            .unwrap();

        let err = register(&store, credentials("accents@example.com", "\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Journal(JournalError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_normalized_email() {
        let store = MemoryStore::new();
        register(&store, credentials("dev@example.com", "password1"))
            .await
            .unwrap();

        let err = register(&store, credentials(" DEV@example.COM", "password2"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Journal(JournalError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_failures_are_indistinguishable() {
        let store = MemoryStore::new();
        register(&store, credentials("dev@example.com", "password1"))
            .await
            .unwrap();

        let wrong_password = authenticate(&store, credentials("dev@example.com", "password2"))
            .await
            .unwrap_err();
        let unknown_user = authenticate(&store, credentials("nobody@example.com", "password1"))
            .await
            .unwrap_err();
        let empty = authenticate(&store, credentials("", "")).await.unwrap_err();

        for err in [wrong_password, unknown_user, empty] {
            assert!(matches!(err, ApiError::InvalidCredentials));
        }
    }

    #[tokio::test]
    async fn test_account_without_hash_cannot_log_in() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store
            .insert_user(&User {
                id: Uuid::new_v4(),
                email: "legacy@example.com".to_string(),
                password_hash: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        let err = authenticate(&store, credentials("legacy@example.com", "whatever1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
    }
}
