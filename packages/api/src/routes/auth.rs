use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use diary_store::JournalStore;
use tower_sessions::Session;
use tracing::{info, warn};

use super::{done, json_body, Created, Done};
use crate::auth::{self, Credentials, SessionUser, SESSION_USER_KEY};
use crate::error::ApiError;
use crate::models::UserInfo;
use crate::state::AppState;

pub async fn register<S: JournalStore + 'static>(
    State(state): State<AppState<S>>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<Created>, ApiError> {
    let credentials = json_body(body)?;
    let id = auth::register(state.journal.store(), credentials).await?;
    info!(user_id = %id, "user registered");
    Ok(Json(Created::from(id)))
}

/// Verify credentials and bind the user to a fresh session id.
pub async fn login<S: JournalStore + 'static>(
    State(state): State<AppState<S>>,
    session: Session,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<UserInfo>, ApiError> {
    let credentials = json_body(body)?;
    let user = match auth::authenticate(state.journal.store(), credentials).await {
        Ok(user) => user,
        Err(err) => {
            if matches!(err, ApiError::InvalidCredentials) {
                warn!("login failed");
            }
            return Err(err);
        }
    };

    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, &user).await?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(UserInfo::from(&user)))
}

pub async fn logout(session: Session) -> Result<Json<Done>, ApiError> {
    if let Ok(Some(user)) = session.get::<SessionUser>(SESSION_USER_KEY).await {
        info!(user_id = %user.id, "user logged out");
    }
    session.flush().await?;
    Ok(done())
}

pub async fn me(Extension(user): Extension<SessionUser>) -> Json<UserInfo> {
    Json(UserInfo::from(&user))
}
