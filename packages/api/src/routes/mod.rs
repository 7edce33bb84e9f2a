//! HTTP handlers, grouped by resource. Every handler under [`projects`], [`entries`] and
//! [`dashboard`] runs behind the session gate and reads the caller from the
//! [`SessionUser`](crate::auth::SessionUser) request extension.

pub mod auth;
pub mod dashboard;
pub mod entries;
pub mod projects;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::Json;
use diary_store::JournalError;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: String,
}

impl From<Uuid> for Created {
    fn from(id: Uuid) -> Self {
        Self { id: id.to_string() }
    }
}

#[derive(Debug, Serialize)]
pub struct Done {
    pub ok: bool,
}

pub(crate) fn done() -> Json<Done> {
    Json(Done { ok: true })
}

/// Unwrap a JSON body; an unreadable body is a validation failure.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| JournalError::validation(rejection.body_text()).into())
}

/// Unwrap a query string; duplicate or malformed parameters are a validation failure.
pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| JournalError::validation(rejection.body_text()).into())
}

pub(crate) fn path_id(path: Result<Path<String>, PathRejection>) -> Result<String, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| JournalError::validation(rejection.body_text()).into())
}
