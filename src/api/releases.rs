//! Release listing and rollback endpoints for the dashboard.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{ReleaseSummary, RollbackRequest};
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ReleasesResponse {
    pub releases: Vec<ReleaseSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RollbackResponse {
    pub success: bool,
}

/// GET /api/releases - List all releases, newest first.
pub async fn list_releases(
    State(state): State<AppState>,
) -> Result<Json<ReleasesResponse>, AppError> {
    let releases = state.repo.list_releases().await?;
    Ok(Json(ReleasesResponse { releases }))
}

/// POST /api/rollback - Re-promote a previously published release.
///
/// Re-activates the target and refreshes its ordering timestamp so
/// subsequent manifest resolutions select it. Bundle and hash associations
/// are never touched; an unknown target fails without altering any state.
pub async fn rollback(
    State(state): State<AppState>,
    Json(request): Json<RollbackRequest>,
) -> Result<Json<RollbackResponse>, AppError> {
    let path = request
        .path
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let runtime_version = request
        .runtime_version
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let (Some(path), Some(runtime_version)) = (path, runtime_version) else {
        return Err(AppError::Validation(
            "path and runtimeVersion are required".to_string(),
        ));
    };

    let Some(release) = state
        .repo
        .find_release_by_path(path, runtime_version)
        .await?
    else {
        return Err(AppError::NotFound(format!(
            "Release not found for path {}",
            path
        )));
    };

    state.repo.reactivate_release(&release.id).await?;

    tracing::info!(
        release_id = %release.id,
        runtime_version,
        commit_hash = request.commit_hash.as_deref().unwrap_or("n/a"),
        "release rolled back"
    );

    Ok(Json(RollbackResponse { success: true }))
}
