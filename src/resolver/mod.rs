//! Manifest resolution: decides what update, if any, a device receives.
//!
//! The funnel is strictly sequential and short-circuits at each step,
//! cheapest and most restrictive first, so opted-out users and unmatched
//! runtime versions never cost a signed-URL mint.

use std::sync::Arc;
use std::time::Duration;

use crate::db::ReleaseStore;
use crate::errors::AppError;
use crate::models::{ManifestRequest, UpdateManifest};
use crate::storage::ArtifactStore;

/// Outcome of a manifest resolution that is not an error.
#[derive(Debug)]
pub enum ManifestOutcome {
    /// An update is available for the device.
    Update(UpdateManifest),
    /// The user has opted out of OTA updates.
    Suppressed,
    /// No active release matches the runtime version.
    NotEligible,
}

pub struct Resolver {
    store: Arc<dyn ReleaseStore>,
    artifacts: Arc<dyn ArtifactStore>,
    sign_timeout: Duration,
}

impl Resolver {
    pub fn new(
        store: Arc<dyn ReleaseStore>,
        artifacts: Arc<dyn ArtifactStore>,
        sign_timeout: Duration,
    ) -> Self {
        Self {
            store,
            artifacts,
            sign_timeout,
        }
    }

    /// Resolve the update for a device identity.
    ///
    /// A missing bundle for an active release is a data-integrity error, not
    /// a "no update" case; no active release is an expected steady state.
    pub async fn resolve(&self, request: &ManifestRequest) -> Result<ManifestOutcome, AppError> {
        let user_id = request
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let runtime_version = request
            .runtime_version
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let (Some(user_id), Some(runtime_version)) = (user_id, runtime_version) else {
            return Err(AppError::Validation(
                "userId and runtimeVersion are required".to_string(),
            ));
        };

        // 1. Opt-out check. Absence of a row means opted in.
        if let Some(setting) = self.store.find_user_setting(user_id).await? {
            if !setting.ota_enabled {
                tracing::debug!(user_id, "OTA disabled for user, suppressing update");
                return Ok(ManifestOutcome::Suppressed);
            }
        }

        // 2. Latest active release for the runtime version.
        let Some(release) = self
            .store
            .find_latest_active_release(runtime_version)
            .await?
        else {
            return Ok(ManifestOutcome::NotEligible);
        };

        // 3. Bundle lookup.
        let Some(bundle) = self.store.find_bundle_for_release(&release.id).await? else {
            tracing::error!(release_id = %release.id, "active release has no bundle");
            return Err(AppError::BundleMissing {
                release_id: release.id,
            });
        };

        // 4. Signed URL mint, bounded so a stalled provider cannot hang the
        // request.
        let minted = tokio::time::timeout(
            self.sign_timeout,
            self.artifacts.create_signed_url(&bundle.file_path),
        )
        .await;

        let signed = match minted {
            Ok(result) => result?,
            Err(_) => {
                return Err(AppError::Signing {
                    message: "Failed to create signed URL".to_string(),
                    details: Some(serde_json::json!({
                        "path": bundle.file_path,
                        "reason": "timed out",
                        "timeoutSecs": self.sign_timeout.as_secs(),
                    })),
                });
            }
        };

        Ok(ManifestOutcome::Update(UpdateManifest {
            id: release.id,
            bundle_url: signed.url,
            hash: bundle.hash,
        }))
    }
}
