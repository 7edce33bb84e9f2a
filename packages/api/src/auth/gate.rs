//! Route-level session gate for the journal namespace.

use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;
use tracing::warn;

use super::session::{SessionUser, SESSION_USER_KEY};
use crate::error::ApiError;

/// Resolve the caller from the session or reject with 401.
///
/// On success the [`SessionUser`] is inserted as a request extension for the handlers.
pub async fn require_user(
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = match session.get::<SessionUser>(SESSION_USER_KEY).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(ApiError::Unauthorized),
        Err(err) => {
            warn!(error = %err, "rejecting unreadable session");
            return Err(ApiError::Unauthorized);
        }
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
