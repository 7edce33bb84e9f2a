use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Extension, Json, Router};
use diary_store::{
    Cascade, JournalError, JournalStore, ProjectDetail, ProjectInput, ProjectOption,
    ProjectQuery, ProjectRecord,
};
use tracing::{error, info};

use super::{done, json_body, path_id, query_params, Created, Done};
use crate::auth::SessionUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn router<S: JournalStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route("/projects", get(list::<S>).post(create::<S>))
        .route("/projects/options", get(options::<S>))
        .route(
            "/projects/{id}",
            get(show::<S>).patch(replace::<S>).delete(remove::<S>),
        )
}

async fn list<S: JournalStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<SessionUser>,
    query: Result<Query<ProjectQuery>, QueryRejection>,
) -> Result<Json<Vec<ProjectRecord>>, ApiError> {
    let query = query_params(query)?;
    Ok(Json(state.journal.browse_projects(user.id, &query).await?))
}

async fn create<S: JournalStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<SessionUser>,
    body: Result<Json<ProjectInput>, JsonRejection>,
) -> Result<Json<Created>, ApiError> {
    let input = json_body(body)?;
    let id = state.journal.create_project(user.id, input).await?;
    Ok(Json(Created::from(id)))
}

async fn options<S: JournalStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<Vec<ProjectOption>>, ApiError> {
    Ok(Json(state.journal.project_options(user.id).await?))
}

async fn show<S: JournalStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<SessionUser>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<ProjectDetail>, ApiError> {
    let id = path_id(id)?;
    state
        .journal
        .project_detail(user.id, &id)
        .await?
        .map(Json)
        .ok_or_else(|| JournalError::NotFound.into())
}

/// PATCH replaces the whole project; fields missing from the body are reset.
async fn replace<S: JournalStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<SessionUser>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<ProjectInput>, JsonRejection>,
) -> Result<Json<Done>, ApiError> {
    let id = path_id(id)?;
    let input = json_body(body)?;
    state.journal.update_project(user.id, &id, input).await?;
    Ok(done())
}

async fn remove<S: JournalStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<SessionUser>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Done>, ApiError> {
    let id = path_id(id)?;
    match state.journal.delete_project(user.id, &id).await? {
        Cascade::Unlinked(unlinked) => {
            info!(project_id = %id, unlinked, "project deleted");
        }
        Cascade::Failed(err) => {
            error!(project_id = %id, error = %err, "project deleted but its entries were not unlinked");
        }
    }
    Ok(done())
}
