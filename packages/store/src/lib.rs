pub mod error;
pub mod input;
pub mod models;
pub mod patch;
pub mod record;
pub mod repo;
pub mod view;

mod memory;
pub use memory::MemoryStore;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::JournalError;
pub use input::{EntryPatch, NewEntry, ProjectInput};
pub use models::{
    Entry, EntryChanges, EntryType, Mood, Project, ProjectFields, ProjectOption, ProjectStatus,
    User,
};
pub use patch::Patch;
pub use record::{EntryRecord, ProjectRecord};
pub use repo::{Cascade, Journal, JournalStore};
pub use view::{Dashboard, EntryQuery, EntryView, ProjectDetail, ProjectLink, ProjectQuery};
