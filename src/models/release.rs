//! Release and bundle models.

use serde::{Deserialize, Serialize};

/// A published OTA release for one runtime version.
///
/// Multiple releases may share a `runtime_version`; only the active release
/// with the latest `created_at` is eligible to be served.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub id: String,
    pub runtime_version: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
    pub is_active: bool,
    /// RFC 3339 UTC timestamp. Refreshed on rollback so the rolled-back
    /// release becomes the most recent active one for its runtime version.
    pub created_at: String,
}

/// The packaged update artifact for a release. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub release_id: String,
    pub file_path: String,
    /// SHA-256 hex digest of the bundle file.
    pub hash: String,
    pub size: i64,
}

/// Release row joined with its bundle metadata, as shown in the dashboard
/// releases table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseSummary {
    pub id: String,
    /// Bundle file path, if the release has a bundle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub runtime_version: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    pub commit_hash: Option<String>,
    pub commit_message: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}
