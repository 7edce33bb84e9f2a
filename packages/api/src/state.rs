use std::sync::Arc;

use diary_store::{Journal, JournalStore};

/// Shared router state.
pub struct AppState<S: JournalStore> {
    pub journal: Arc<Journal<S>>,
}

impl<S: JournalStore> AppState<S> {
    pub fn new(store: S) -> Self {
        Self {
            journal: Arc::new(Journal::new(store)),
        }
    }
}

impl<S: JournalStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            journal: Arc::clone(&self.journal),
        }
    }
}
