//! # Database module: PostgreSQL persistence
//!
//! - [`connect`] opens the pool from [`crate::settings::Database`]; the database name in
//!   the settings overrides the one in the URL.
//! - [`migrate`] applies the SQL files embedded from `packages/api/migrations`.
//! - [`PgStore`] implements [`diary_store::JournalStore`] on top of the pool.
//!
//! There is no global handle: the binary creates the pool once and injects it.

mod pool;
mod postgres;

pub use pool::{connect, migrate};
pub use postgres::PgStore;
