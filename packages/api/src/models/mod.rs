//! Database rows and client projections.

mod journal;
mod user;

pub use journal::{EntryRow, ProjectRow, ENTRY_COLUMNS, PROJECT_COLUMNS};
pub use user::{UserInfo, UserRow};
