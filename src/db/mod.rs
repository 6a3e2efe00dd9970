//! Database module for SQLite persistence.
//!
//! SQLite holds releases, bundles, per-user OTA settings, and download
//! metrics. Releases and bundles are written by the publishing pipeline;
//! this backend reads them and, for rollback, re-marks a release active.

mod repository;

pub use repository::*;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

use crate::errors::AppError;
use crate::models::{Bundle, Release, UserOtaSetting};

/// The queries manifest resolution needs, and nothing more.
///
/// Narrow by design so any relational or document store can back it and so
/// tests can substitute fakes with call counting.
#[async_trait]
pub trait ReleaseStore: Send + Sync {
    /// Look up a user's OTA setting. `None` means the user is opted in.
    async fn find_user_setting(&self, user_id: &str) -> Result<Option<UserOtaSetting>, AppError>;

    /// The active release with the latest creation timestamp for a runtime
    /// version, if any.
    async fn find_latest_active_release(
        &self,
        runtime_version: &str,
    ) -> Result<Option<Release>, AppError>;

    /// The bundle belonging to a release, if one was published.
    async fn find_bundle_for_release(&self, release_id: &str)
        -> Result<Option<Bundle>, AppError>;
}

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run embedded migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_ota_settings (
            user_id TEXT PRIMARY KEY,
            ota_enabled INTEGER NOT NULL DEFAULT 1
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS releases (
            id TEXT PRIMARY KEY,
            runtime_version TEXT NOT NULL,
            version TEXT NOT NULL,
            commit_hash TEXT,
            commit_message TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bundles (
            release_id TEXT PRIMARY KEY REFERENCES releases(id),
            file_path TEXT NOT NULL,
            hash TEXT NOT NULL,
            size INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS download_metrics (
            release_id TEXT NOT NULL,
            platform TEXT NOT NULL,
            count INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (release_id, platform)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for common queries
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_releases_runtime_active
            ON releases(runtime_version, is_active, created_at);
        CREATE INDEX IF NOT EXISTS idx_bundles_file_path ON bundles(file_path);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
