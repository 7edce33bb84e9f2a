//! Credential authentication and session handling.

pub mod credentials;
mod gate;
pub mod password;
mod session;

pub use credentials::{authenticate, normalize_email, register, Credentials};
pub use gate::require_user;
pub use password::{hash_password, verify_password};
pub use session::{session_layer, SessionUser, SESSION_USER_KEY};
