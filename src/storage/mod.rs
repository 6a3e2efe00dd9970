//! Artifact storage: bundle files and time-limited signed download URLs.

mod local;
mod signer;

pub use local::*;
pub use signer::*;

use async_trait::async_trait;

use crate::errors::AppError;

/// A time-limited capability URL for downloading a bundle.
#[derive(Debug, Clone)]
pub struct SignedUrl {
    pub url: String,
    /// Unix timestamp (seconds) after which the URL stops working.
    pub expires_at: i64,
}

/// Blob storage capable of minting signed download URLs for bundle paths.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn create_signed_url(&self, file_path: &str) -> Result<SignedUrl, AppError>;
}
