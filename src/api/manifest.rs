//! Manifest endpoint: the wire boundary of the resolver.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::errors::AppError;
use crate::models::ManifestRequest;
use crate::resolver::ManifestOutcome;
use crate::AppState;

/// POST /api/manifest - Resolve the update for a device.
///
/// 204 covers both "user opted out" and "no active release"; the device has
/// nothing to do either way.
pub async fn post_manifest(
    State(state): State<AppState>,
    Json(request): Json<ManifestRequest>,
) -> Result<Response, AppError> {
    match state.resolver.resolve(&request).await? {
        ManifestOutcome::Update(manifest) => Ok((StatusCode::OK, Json(manifest)).into_response()),
        ManifestOutcome::Suppressed | ManifestOutcome::NotEligible => {
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}
