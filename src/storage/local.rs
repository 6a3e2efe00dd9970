//! Filesystem-backed artifact store.
//!
//! Bundle files live under a storage root; download capability is granted by
//! HMAC-signed URLs served back through the bundle download endpoint.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::{ArtifactStore, SignedUrl, UrlSigner};
use crate::errors::AppError;

pub struct LocalArtifactStore {
    root: PathBuf,
    public_url: String,
    signer: UrlSigner,
    ttl: Duration,
}

impl LocalArtifactStore {
    /// Open the store, creating the storage root if needed.
    pub fn open(
        root: impl Into<PathBuf>,
        public_url: impl Into<String>,
        signing_secret: &str,
        ttl: Duration,
    ) -> std::io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            public_url: public_url.into().trim_end_matches('/').to_string(),
            signer: UrlSigner::new(signing_secret.as_bytes().to_vec()),
            ttl,
        })
    }

    /// Verify a presented signature and resolve the path inside the storage
    /// root. Rejects expired or forged tokens and traversal attempts.
    pub fn resolve_verified(
        &self,
        file_path: &str,
        expires: i64,
        token: &str,
    ) -> Result<PathBuf, AppError> {
        let rel = sanitize_rel_path(file_path)
            .ok_or_else(|| AppError::Forbidden("Invalid bundle path".to_string()))?;

        if !self
            .signer
            .verify(&rel, expires, token, Utc::now().timestamp())
        {
            return Err(AppError::Forbidden(
                "Invalid or expired signature".to_string(),
            ));
        }

        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn create_signed_url(&self, file_path: &str) -> Result<SignedUrl, AppError> {
        let rel = sanitize_rel_path(file_path).ok_or_else(|| AppError::Signing {
            message: "Failed to create signed URL".to_string(),
            details: Some(serde_json::json!({
                "path": file_path,
                "reason": "invalid object path",
            })),
        })?;

        // Minting fails for objects that do not exist, so a stale bundle row
        // surfaces here instead of producing a dead download link.
        if tokio::fs::metadata(self.root.join(&rel)).await.is_err() {
            return Err(AppError::Signing {
                message: "Failed to create signed URL".to_string(),
                details: Some(serde_json::json!({
                    "path": rel,
                    "reason": "object not found",
                })),
            });
        }

        let expires_at = Utc::now().timestamp() + self.ttl.as_secs() as i64;
        let token = self.signer.sign(&rel, expires_at);
        let url = format!(
            "{}/api/bundles/{}?expires={}&sig={}",
            self.public_url, rel, expires_at, token
        );

        Ok(SignedUrl { url, expires_at })
    }
}

/// Accept only plain relative paths: no leading slash, no `.`/`..` segments,
/// no backslashes, no empty segments.
fn sanitize_rel_path(path: &str) -> Option<String> {
    if path.is_empty() || path.contains('\\') {
        return None;
    }
    for segment in path.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return None;
        }
    }
    Some(path.to_string())
}
