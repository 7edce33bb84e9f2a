use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diary_store::JournalError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Journal(#[from] JournalError),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Journal(err) => match err {
                JournalError::Validation(_)
                | JournalError::InvalidId
                | JournalError::InvalidProjectId => StatusCode::BAD_REQUEST,
                JournalError::NotFound => StatusCode::NOT_FOUND,
                JournalError::Conflict(_) => StatusCode::CONFLICT,
                JournalError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Session(_) | ApiError::Hashing(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
