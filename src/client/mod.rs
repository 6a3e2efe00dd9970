//! Device-side update client.
//!
//! The update mechanism is modeled as three opaque operations: check for an
//! update, fetch it, and reload the application. The HTTP implementation
//! talks to the manifest endpoint and verifies bundle integrity; the actual
//! apply/reload mechanics stay with the embedding application, which
//! supplies them as a hook.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::models::{ManifestRequest, Platform, UpdateManifest};

/// Result of an update check.
#[derive(Debug)]
pub enum UpdateCheck {
    /// The device already runs the current release.
    UpToDate,
    /// An update is available for download.
    Available(UpdateManifest),
}

/// Errors surfaced to the device application.
#[derive(Debug)]
pub enum ClientError {
    /// Transport-level failure
    Http(String),
    /// The server answered with an unexpected status
    Server { status: u16, message: String },
    /// Downloaded bundle does not match the manifest hash
    HashMismatch { expected: String, actual: String },
    /// The reload hook failed
    Reload(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Http(msg) => write!(f, "http error: {}", msg),
            ClientError::Server { status, message } => {
                write!(f, "server error ({}): {}", status, message)
            }
            ClientError::HashMismatch { expected, actual } => {
                write!(f, "bundle hash mismatch: expected {}, got {}", expected, actual)
            }
            ClientError::Reload(msg) => write!(f, "reload failed: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err.to_string())
    }
}

/// The three operations a device needs from an update mechanism.
#[async_trait]
pub trait UpdateClient: Send + Sync {
    async fn check_for_update(&self) -> Result<UpdateCheck, ClientError>;
    async fn fetch_update(&self, manifest: &UpdateManifest) -> Result<Vec<u8>, ClientError>;
    async fn reload(&self) -> Result<(), ClientError>;
}

/// Identity a device presents to the manifest endpoint.
#[derive(Debug, Clone)]
pub struct DeviceIdentity {
    pub app_id: String,
    pub platform: Platform,
    pub runtime_version: String,
    pub user_id: String,
}

/// Hook invoked by [`HttpUpdateClient::reload`]; the embedding application
/// supplies its native restart mechanism here.
pub type ReloadHook = Box<dyn Fn() -> Result<(), String> + Send + Sync>;

/// Thin HTTP client for the manifest endpoint.
pub struct HttpUpdateClient {
    http: reqwest::Client,
    manifest_url: String,
    identity: DeviceIdentity,
    /// Release id the device currently runs, if any.
    installed_update_id: Option<String>,
    reload_hook: ReloadHook,
}

impl HttpUpdateClient {
    pub fn new(
        manifest_url: impl Into<String>,
        identity: DeviceIdentity,
        installed_update_id: Option<String>,
        reload_hook: ReloadHook,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            manifest_url: manifest_url.into(),
            identity,
            installed_update_id,
            reload_hook,
        }
    }
}

#[async_trait]
impl UpdateClient for HttpUpdateClient {
    async fn check_for_update(&self) -> Result<UpdateCheck, ClientError> {
        let body = ManifestRequest {
            app_id: Some(self.identity.app_id.clone()),
            platform: Some(self.identity.platform.as_str().to_string()),
            runtime_version: Some(self.identity.runtime_version.clone()),
            user_id: Some(self.identity.user_id.clone()),
        };

        let response = self.http.post(&self.manifest_url).json(&body).send().await?;

        match response.status().as_u16() {
            204 => Ok(UpdateCheck::UpToDate),
            200 => {
                let manifest: UpdateManifest = response.json().await?;
                if self.installed_update_id.as_deref() == Some(manifest.id.as_str()) {
                    Ok(UpdateCheck::UpToDate)
                } else {
                    Ok(UpdateCheck::Available(manifest))
                }
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(ClientError::Server { status, message })
            }
        }
    }

    async fn fetch_update(&self, manifest: &UpdateManifest) -> Result<Vec<u8>, ClientError> {
        let response = self.http.get(&manifest.bundle_url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Server { status, message });
        }

        let bytes = response.bytes().await?.to_vec();

        let actual = sha256_hex(&bytes);
        if !actual.eq_ignore_ascii_case(&manifest.hash) {
            return Err(ClientError::HashMismatch {
                expected: manifest.hash.clone(),
                actual,
            });
        }

        Ok(bytes)
    }

    async fn reload(&self) -> Result<(), ClientError> {
        (self.reload_hook)().map_err(ClientError::Reload)
    }
}

/// SHA-256 hex digest, lowercase.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_known_vector() {
        // sha256("abc")
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_hex_empty() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
