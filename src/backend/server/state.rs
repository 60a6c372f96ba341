/**
 * Application State Management
 *
 * `AppState` is the single state container handed to the router. Every
 * field is cheap to clone (`Arc`s and signing keys), so axum clones it per
 * request.
 *
 * # State Extraction
 *
 * The `FromRef` implementations let handlers extract just the part they
 * need, following axum's recommended pattern:
 *
 * ```rust,ignore
 * async fn handler(State(store): State<Arc<dyn Store>>) { /* ... */ }
 * ```
 */

use axum::extract::FromRef;
use std::sync::Arc;

use crate::backend::auth::oauth::GoogleOAuth;
use crate::backend::auth::sessions::SessionTokens;
use crate::backend::media::MediaStore;
use crate::backend::moderation::ContentClassifier;
use crate::backend::notify::Notifier;
use crate::backend::posts::pipeline::PostPipeline;
use crate::backend::server::config::ServerConfig;
use crate::backend::store::Store;

/// External collaborators the server is wired with
///
/// Production builds these from `ServerConfig`; tests pass fakes.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn Store>,
    pub classifier: Arc<dyn ContentClassifier>,
    pub media: Arc<dyn MediaStore>,
    pub notifier: Arc<dyn Notifier>,
    pub google: GoogleOAuth,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: Arc<dyn Store>,
    pub tokens: SessionTokens,
    pub google: Arc<GoogleOAuth>,
    pub pipeline: Arc<PostPipeline>,
}

impl AppState {
    pub fn new(config: ServerConfig, services: Services) -> Self {
        let pipeline = PostPipeline::new(
            services.store.clone(),
            services.classifier,
            services.media,
            services.notifier,
            config.classifier.violation_label.clone(),
        );

        Self {
            tokens: SessionTokens::new(&config.session.secret),
            config: Arc::new(config),
            store: services.store,
            google: Arc::new(services.google),
            pipeline: Arc::new(pipeline),
        }
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn Store> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for SessionTokens {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.tokens.clone()
    }
}
