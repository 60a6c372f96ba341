/**
 * Server Initialization
 *
 * # Initialization Process
 *
 * 1. Open the store (PostgreSQL with migrations when `DATABASE_URL` is set,
 *    otherwise the in-memory store)
 * 2. Build the classifier, media store, notifier and Google OAuth clients
 * 3. Assemble `AppState` and the router
 * 4. Start the periodic expired-session purge
 *
 * Unlike the store, the outbound clients are not optional: a server that
 * cannot moderate or upload refuses to start.
 */

use axum::Router;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::backend::auth::oauth::{GoogleOAuth, OAuthError};
use crate::backend::media::{CloudinaryStore, MediaStoreError};
use crate::backend::moderation::{ClassifierError, HttpClassifier};
use crate::backend::notify::{NotifyError, SmtpNotifier};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{ConfigError, ServerConfig};
use crate::backend::server::state::{AppState, Services};
use crate::backend::store::{MemoryStore, PgStore, Store, StoreError};

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(600);

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store initialization failed: {0}")]
    Store(#[from] StoreError),

    #[error("Classifier client initialization failed: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Media store initialization failed: {0}")]
    Media(#[from] MediaStoreError),

    #[error("Notifier initialization failed: {0}")]
    Notify(#[from] NotifyError),

    #[error("Google OAuth client initialization failed: {0}")]
    OAuth(#[from] OAuthError),
}

/// Open the configured store
pub async fn open_store(config: &ServerConfig) -> Result<Arc<dyn Store>, StoreError> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url).await?;
            store.migrate().await?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (data is lost on restart)");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Build the production collaborators from configuration
pub async fn build_services(config: &ServerConfig) -> Result<Services, StartupError> {
    let store = open_store(config).await?;
    let classifier = HttpClassifier::new(&config.classifier)?;
    let media = CloudinaryStore::new(&config.media)?;
    let notifier = SmtpNotifier::new(&config.email, &config.client_url)?;
    let google = GoogleOAuth::new(&config.google)?;

    Ok(Services {
        store,
        classifier: Arc::new(classifier),
        media: Arc::new(media),
        notifier: Arc::new(notifier),
        google,
    })
}

/// Periodically delete expired sessions
pub fn spawn_session_purge(store: Arc<dyn Store>, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            match store.purge_expired_sessions(Utc::now()).await {
                Ok(0) => {}
                Ok(purged) => tracing::debug!(purged, "Purged expired sessions"),
                Err(e) => tracing::warn!(error = %e, "Failed to purge expired sessions"),
            }
        }
    })
}

/// Create and configure the Axum application
pub async fn create_app(config: ServerConfig) -> Result<Router, StartupError> {
    tracing::info!("Initializing SocialHub backend server");

    config.validate()?;
    let services = build_services(&config).await?;

    let state = AppState::new(config, services);
    spawn_session_purge(state.store.clone(), SESSION_PURGE_INTERVAL);

    let app = create_router(state);
    tracing::info!("Router configured with periodic session purge");

    Ok(app)
}
