//! Request and response shapes for the manifest, rollback, and login endpoints.

use serde::{Deserialize, Serialize};

/// Device identity posted to `POST /api/manifest`.
///
/// `app_id` and `platform` are informational context; only `user_id` and
/// `runtime_version` are validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestRequest {
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub runtime_version: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Successful manifest response: the update a device should download.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateManifest {
    /// Release id.
    pub id: String,
    /// Time-limited signed download URL for the bundle.
    pub bundle_url: String,
    /// SHA-256 hex digest of the bundle, for client-side verification.
    pub hash: String,
}

/// Rollback request, identifying the target release by its bundle path and
/// runtime version as shown in the dashboard releases table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackRequest {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub runtime_version: Option<String>,
    #[serde(default)]
    pub commit_hash: Option<String>,
    #[serde(default)]
    pub commit_message: Option<String>,
}

/// Admin login request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}
