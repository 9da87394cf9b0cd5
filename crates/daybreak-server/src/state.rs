use std::sync::Arc;

use daybreak_checkin::store::InMemoryLogStore;
use daybreak_checkin::CheckinService;
use daybreak_gemini::client::GeminiClient;
use daybreak_staging::{StagingArea, UploadLimits};

use crate::auth::{SessionStore, StaticSessionStore};
use crate::config::ServerConfig;

/// Shared application state, injected into route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CheckinService>,
    pub sessions: Arc<dyn SessionStore>,
    pub max_upload_bytes: u64,
}

impl AppState {
    /// Wire the production collaborators from configuration.
    pub fn from_config(config: &ServerConfig) -> eyre::Result<Self> {
        let provider = GeminiClient::new(
            config.gemini_base_url.clone(),
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
        );

        let limits = UploadLimits {
            max_bytes: config.max_upload_bytes,
            ..UploadLimits::default()
        };
        let staging = StagingArea::new(&config.staging_root, limits);

        let service = CheckinService::new(
            Arc::new(provider),
            Arc::new(InMemoryLogStore::new()),
            staging,
            config.poll.clone(),
        );

        let sessions = StaticSessionStore::from_spec(&config.sessions_spec)?;

        Ok(Self {
            service: Arc::new(service),
            sessions: Arc::new(sessions),
            max_upload_bytes: config.max_upload_bytes,
        })
    }
}
