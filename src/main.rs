use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use xavia_ota::config::{Config, DEV_SIGNING_SECRET};
use xavia_ota::db::{self, Repository};
use xavia_ota::resolver::Resolver;
use xavia_ota::storage::LocalArtifactStore;
use xavia_ota::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Xavia OTA Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bundle storage path: {:?}", config.storage_path);
    tracing::info!("Public URL: {}", config.public_url);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn about insecure defaults
    if config.admin_password.is_none() {
        tracing::warn!(
            "No admin password configured (OTA_ADMIN_PASSWORD). Admin API authentication is disabled!"
        );
    }
    if config.signing_secret == DEV_SIGNING_SECRET {
        tracing::warn!(
            "Using the development signing secret (set OTA_SIGNING_SECRET). Signed URLs are forgeable!"
        );
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Initialize bundle storage
    let artifacts = Arc::new(LocalArtifactStore::open(
        &config.storage_path,
        config.public_url.as_str(),
        &config.signing_secret,
        config.signed_url_ttl,
    )?);

    // Manifest resolver over the store and artifact seams
    let resolver = Arc::new(Resolver::new(
        repo.clone(),
        artifacts.clone(),
        config.sign_timeout,
    ));

    // Create application state
    let state = AppState {
        repo,
        resolver,
        artifacts,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
