//! Signed bundle download endpoint.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::Platform;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    pub expires: i64,
    pub sig: String,
    /// Informational; counted when it parses as a known platform.
    #[serde(default)]
    pub platform: Option<String>,
}

/// GET /api/bundles/{*path} - Serve a bundle to a signed URL holder.
///
/// Verifies expiry and signature before touching the filesystem, then
/// increments the download metric for the bundle's release.
pub async fn download_bundle(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(params): Query<DownloadParams>,
) -> Result<Response, AppError> {
    let file = state
        .artifacts
        .resolve_verified(&path, params.expires, &params.sig)?;

    let bytes = tokio::fs::read(&file).await.map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            AppError::NotFound(format!("Bundle file {} not found", path))
        } else {
            AppError::Internal(format!("Failed to read bundle {}: {}", path, err))
        }
    })?;

    record_download(&state, &path, params.platform.as_deref()).await;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/octet-stream")],
        bytes,
    )
        .into_response())
}

/// Metric bookkeeping must not fail a download that already succeeded.
async fn record_download(state: &AppState, path: &str, platform: Option<&str>) {
    let Some(platform) = platform.and_then(Platform::from_str) else {
        return;
    };

    let release_id = match state.repo.find_bundle_by_path(path).await {
        Ok(Some(bundle)) => bundle.release_id,
        Ok(None) => return,
        Err(err) => {
            tracing::warn!("Failed to look up bundle for metrics: {}", err);
            return;
        }
    };

    if let Err(err) = state.repo.record_download(&release_id, platform).await {
        tracing::warn!(release_id = %release_id, "Failed to record download: {}", err);
    }
}
