//! Session data and the session cookie layer.

use serde::{Deserialize, Serialize};
use tower_sessions::cookie::{time::Duration, Key, KeyError, SameSite};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use uuid::Uuid;

use crate::settings::Settings;

/// Key under which the signed-in user is stored in the session.
pub const SESSION_USER_KEY: &str = "user";

/// Identity of the signed-in caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
}

/// Build the session layer: signed cookie, `Lax`, expiring after inactivity.
///
/// Fails when the configured secret is shorter than 64 bytes.
pub fn session_layer<S: SessionStore + Clone>(
    store: S,
    settings: &Settings,
) -> Result<SessionManagerLayer<S, SignedCookie>, KeyError> {
    let key = Key::try_from(settings.session.secret.as_bytes())?;

    Ok(SessionManagerLayer::new(store)
        .with_secure(settings.server.secure_cookies())
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(
            settings.session.expiry_days,
        )))
        .with_signed(key))
}
