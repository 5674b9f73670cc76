//! Database Module
//!
//! Handles the SQLite catalog connection pool and migrations

use crate::core::SkuError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;

/// Database service — owns the catalog SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open the catalog database with WAL mode and apply migrations
    pub async fn new(db_path: &str) -> Result<Self, SkuError> {
        // Build connection options: WAL, foreign keys, normal sync
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| SkuError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON")
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| SkuError::database(format!("Failed to open database: {e}")))?;

        // busy_timeout: 写冲突时等待 5s 而非立即失败
        sqlx::query("PRAGMA busy_timeout = 5000;")
            .execute(&pool)
            .await
            .map_err(|e| SkuError::database(format!("Failed to set busy_timeout: {e}")))?;

        tracing::info!("Catalog database opened (SQLite WAL, busy_timeout=5000ms)");

        // Run migrations (ignore previously applied but now removed migrations)
        sqlx::migrate!("./migrations")
            .set_ignore_missing(true)
            .run(&pool)
            .await
            .map_err(|e| SkuError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Catalog migrations applied");

        Ok(Self { pool })
    }
}
