use axum::extract::State;
use axum::{Extension, Json};
use diary_store::{Dashboard, JournalStore};

use crate::auth::SessionUser;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn show<S: JournalStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<Dashboard>, ApiError> {
    Ok(Json(state.journal.dashboard(user.id, &user.email).await?))
}
