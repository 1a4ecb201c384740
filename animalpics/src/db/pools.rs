//! SQLite connection pool setup.

use std::{str::FromStr, time::Duration};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use tracing::{info, instrument};

use crate::config::DatabaseConfig;
use crate::db::errors::Result;

/// Open the pool described by `config`, creating the database file if it does not exist.
#[instrument(skip_all, fields(url = %config.url), err)]
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(config.pool.busy_timeout_secs));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.pool.max_connections)
        .acquire_timeout(Duration::from_secs(config.pool.acquire_timeout_secs))
        .connect_with(options)
        .await?;

    info!(max_connections = config.pool.max_connections, "Database pool ready");
    Ok(pool)
}
