//! Download metrics endpoint for the dashboard.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{DownloadMetric, TrackingSummary};
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingResponse {
    pub trackings: Vec<DownloadMetric>,
    pub total_releases: i64,
    pub summary: TrackingSummary,
}

/// GET /api/tracking/all - Aggregate download counts.
pub async fn all_tracking(
    State(state): State<AppState>,
) -> Result<Json<TrackingResponse>, AppError> {
    let trackings = state.repo.list_download_metrics().await?;
    let total_releases = state.repo.count_releases().await?;
    let summary = TrackingSummary::from_metrics(&trackings);

    Ok(Json(TrackingResponse {
        trackings,
        total_releases,
        summary,
    }))
}
