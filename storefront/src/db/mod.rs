//! Database Module
//!
//! Handles the SQLite connection pool and migrations

pub mod repository;

use crate::utils::AppError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;

/// Database service, owns the SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) the store file, enable WAL and apply migrations
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!(path = %db_path, "Database connection established (SQLite WAL)");

        // A file created by the catalog import tooling already has its tables,
        // so the initial migration only fills in what is missing.
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        ensure_column(&pool, "orders", "created_at", "INTEGER NOT NULL DEFAULT 0").await?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }
}

/// Add `column` to a table that predates it
///
/// `CREATE TABLE IF NOT EXISTS` leaves an older table untouched, and SQLite
/// has no `ADD COLUMN IF NOT EXISTS`.
async fn ensure_column(
    pool: &SqlitePool,
    table: &'static str,
    column: &'static str,
    decl: &'static str,
) -> Result<(), AppError> {
    let present: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pragma_table_info(?) WHERE name = ?")
        .bind(table)
        .bind(column)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to inspect {table}: {e}")))?;
    if present > 0 {
        return Ok(());
    }

    sqlx::query(&format!("ALTER TABLE {table} ADD COLUMN {column} {decl}"))
        .execute(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to add {table}.{column}: {e}")))?;
    tracing::warn!(table = table, column = column, "Added missing column to existing table");
    Ok(())
}
