//! Configuration module for the OTA backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Fallback signing secret for local development. Never use in production.
pub const DEV_SIGNING_SECRET: &str = "dev-signing-secret";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared admin secret for the dashboard login and admin API (required in production)
    pub admin_password: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Directory holding bundle artifact files
    pub storage_path: PathBuf,
    /// Public base URL under which signed bundle URLs are minted
    pub public_url: String,
    /// HMAC key for signed URL tokens
    pub signing_secret: String,
    /// Signed URL lifetime
    pub signed_url_ttl: Duration,
    /// Upper bound on a single signed-URL mint call
    pub sign_timeout: Duration,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let admin_password = env::var("OTA_ADMIN_PASSWORD").ok();

        let db_path = env::var("OTA_DB_PATH")
            .unwrap_or_else(|_| "./data/ota.sqlite".to_string())
            .into();

        let storage_path = env::var("OTA_STORAGE_PATH")
            .unwrap_or_else(|_| "./data/bundles".to_string())
            .into();

        let bind_addr: SocketAddr = env::var("OTA_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .expect("Invalid OTA_BIND_ADDR format");

        let public_url =
            env::var("OTA_PUBLIC_URL").unwrap_or_else(|_| format!("http://{}", bind_addr));

        let signing_secret =
            env::var("OTA_SIGNING_SECRET").unwrap_or_else(|_| DEV_SIGNING_SECRET.to_string());

        let signed_url_ttl = Duration::from_secs(
            env::var("OTA_SIGNED_URL_TTL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .expect("Invalid OTA_SIGNED_URL_TTL_SECS format"),
        );

        let sign_timeout = Duration::from_secs(
            env::var("OTA_SIGN_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("Invalid OTA_SIGN_TIMEOUT_SECS format"),
        );

        let log_level = env::var("OTA_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            admin_password,
            db_path,
            storage_path,
            public_url,
            signing_secret,
            signed_url_ttl,
            sign_timeout,
            bind_addr,
            log_level,
        }
    }
}
