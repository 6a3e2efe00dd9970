//! Database repository for release, bundle, setting, and metric queries.
//!
//! Uses prepared statements; timestamps are RFC 3339 UTC strings, which
//! order lexicographically the same as chronologically.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use super::ReleaseStore;
use crate::errors::AppError;
use crate::models::{Bundle, DownloadMetric, Platform, Release, ReleaseSummary, UserOtaSetting};

/// SQLite-backed repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

#[async_trait]
impl ReleaseStore for Repository {
    async fn find_user_setting(&self, user_id: &str) -> Result<Option<UserOtaSetting>, AppError> {
        let row = sqlx::query(
            "SELECT user_id, ota_enabled FROM user_ota_settings WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| UserOtaSetting {
            user_id: row.get("user_id"),
            ota_enabled: row.get::<i32, _>("ota_enabled") != 0,
        }))
    }

    async fn find_latest_active_release(
        &self,
        runtime_version: &str,
    ) -> Result<Option<Release>, AppError> {
        let row = sqlx::query(
            "SELECT id, runtime_version, version, commit_hash, commit_message, is_active, created_at \
             FROM releases WHERE runtime_version = ? AND is_active = 1 \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(runtime_version)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(release_from_row))
    }

    async fn find_bundle_for_release(
        &self,
        release_id: &str,
    ) -> Result<Option<Bundle>, AppError> {
        let row = sqlx::query(
            "SELECT release_id, file_path, hash, size FROM bundles WHERE release_id = ?",
        )
        .bind(release_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(bundle_from_row))
    }
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== RELEASE OPERATIONS ====================

    /// List all releases with their bundle metadata, newest first.
    pub async fn list_releases(&self) -> Result<Vec<ReleaseSummary>, AppError> {
        let rows = sqlx::query(
            "SELECT r.id, r.runtime_version, r.version, r.commit_hash, r.commit_message, \
                    r.is_active, r.created_at, b.file_path, b.size \
             FROM releases r LEFT JOIN bundles b ON b.release_id = r.id \
             ORDER BY r.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ReleaseSummary {
                id: row.get("id"),
                path: row.get("file_path"),
                runtime_version: row.get("runtime_version"),
                version: row.get("version"),
                size: row.get("size"),
                commit_hash: row.get("commit_hash"),
                commit_message: row.get("commit_message"),
                is_active: row.get::<i32, _>("is_active") != 0,
                created_at: row.get("created_at"),
            })
            .collect())
    }

    /// Find the release whose bundle lives at `file_path` for a runtime
    /// version. Rollback targets are identified this way by the dashboard.
    pub async fn find_release_by_path(
        &self,
        file_path: &str,
        runtime_version: &str,
    ) -> Result<Option<Release>, AppError> {
        let row = sqlx::query(
            "SELECT r.id, r.runtime_version, r.version, r.commit_hash, r.commit_message, \
                    r.is_active, r.created_at \
             FROM releases r JOIN bundles b ON b.release_id = r.id \
             WHERE b.file_path = ? AND r.runtime_version = ? \
             ORDER BY r.created_at DESC LIMIT 1",
        )
        .bind(file_path)
        .bind(runtime_version)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(release_from_row))
    }

    /// Re-activate a release and refresh its creation timestamp so it becomes
    /// the most recent active release for its runtime version. Idempotent.
    pub async fn reactivate_release(&self, release_id: &str) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query("UPDATE releases SET is_active = 1, created_at = ? WHERE id = ?")
            .bind(&now)
            .bind(release_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Release {} not found",
                release_id
            )));
        }

        Ok(())
    }

    /// Total number of releases.
    pub async fn count_releases(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM releases")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    // ==================== BUNDLE OPERATIONS ====================

    /// Find a bundle by its file path.
    pub async fn find_bundle_by_path(&self, file_path: &str) -> Result<Option<Bundle>, AppError> {
        let row = sqlx::query(
            "SELECT release_id, file_path, hash, size FROM bundles WHERE file_path = ?",
        )
        .bind(file_path)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(bundle_from_row))
    }

    // ==================== METRIC OPERATIONS ====================

    /// Record one bundle download. Increment-only; rows are never deleted.
    pub async fn record_download(
        &self,
        release_id: &str,
        platform: Platform,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO download_metrics (release_id, platform, count) VALUES (?, ?, 1) \
             ON CONFLICT (release_id, platform) DO UPDATE SET count = count + 1",
        )
        .bind(release_id)
        .bind(platform.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All stored download metrics.
    pub async fn list_download_metrics(&self) -> Result<Vec<DownloadMetric>, AppError> {
        let rows = sqlx::query(
            "SELECT release_id, platform, count FROM download_metrics ORDER BY release_id, platform",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| DownloadMetric {
                release_id: row.get("release_id"),
                platform: row.get("platform"),
                count: row.get("count"),
            })
            .collect())
    }
}

// Helper functions for row conversion

fn release_from_row(row: &sqlx::sqlite::SqliteRow) -> Release {
    Release {
        id: row.get("id"),
        runtime_version: row.get("runtime_version"),
        version: row.get("version"),
        commit_hash: row.get("commit_hash"),
        commit_message: row.get("commit_message"),
        is_active: row.get::<i32, _>("is_active") != 0,
        created_at: row.get("created_at"),
    }
}

fn bundle_from_row(row: &sqlx::sqlite::SqliteRow) -> Bundle {
    Bundle {
        release_id: row.get("release_id"),
        file_path: row.get("file_path"),
        hash: row.get("hash"),
        size: row.get("size"),
    }
}
