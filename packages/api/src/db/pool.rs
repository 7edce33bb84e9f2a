//! Database connection pool and migrations.

use std::str::FromStr;

use sqlx::migrate::MigrateError;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::settings::Database;

/// Open the connection pool described by `settings`.
///
/// Called once at startup; the pool is handed to the router state and closed on
/// shutdown.
pub async fn connect(settings: &Database) -> Result<PgPool, sqlx::Error> {
    let options = PgConnectOptions::from_str(&settings.url)?.database(&settings.name);

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
}

/// Apply the embedded schema migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
