use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Extension, Json, Router};
use diary_store::{EntryPatch, EntryQuery, EntryView, JournalError, JournalStore, NewEntry};

use super::{done, json_body, path_id, query_params, Created, Done};
use crate::auth::SessionUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn router<S: JournalStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route("/entries", get(list::<S>).post(create::<S>))
        .route(
            "/entries/{id}",
            get(show::<S>).patch(update::<S>).delete(remove::<S>),
        )
}

/// Filtered listing, pinned entries first.
async fn list<S: JournalStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<SessionUser>,
    query: Result<Query<EntryQuery>, QueryRejection>,
) -> Result<Json<Vec<EntryView>>, ApiError> {
    let query = query_params(query)?;
    Ok(Json(state.journal.browse_entries(user.id, &query).await?))
}

async fn create<S: JournalStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<SessionUser>,
    body: Result<Json<NewEntry>, JsonRejection>,
) -> Result<Json<Created>, ApiError> {
    let input = json_body(body)?;
    let id = state.journal.create_entry(user.id, input).await?;
    Ok(Json(Created::from(id)))
}

async fn show<S: JournalStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<SessionUser>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<EntryView>, ApiError> {
    let id = path_id(id)?;
    state
        .journal
        .entry_detail(user.id, &id)
        .await?
        .map(Json)
        .ok_or_else(|| JournalError::NotFound.into())
}

async fn update<S: JournalStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<SessionUser>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<EntryPatch>, JsonRejection>,
) -> Result<Json<Done>, ApiError> {
    let id = path_id(id)?;
    let patch = json_body(body)?;
    state.journal.update_entry(user.id, &id, patch).await?;
    Ok(done())
}

async fn remove<S: JournalStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<SessionUser>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Done>, ApiError> {
    let id = path_id(id)?;
    state.journal.delete_entry(user.id, &id).await?;
    Ok(done())
}
