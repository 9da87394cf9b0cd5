//! Environment-driven server configuration.

use std::env;
use std::time::Duration;

use daybreak_gemini::analyze::PollConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Directory staged uploads are written to for the request's lifetime.
    pub staging_root: String,
    pub gemini_base_url: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub max_upload_bytes: u64,
    pub poll: PollConfig,
    /// Static session table, `token:role:user_uuid` entries separated by
    /// commas. Session management proper belongs to the surrounding product;
    /// this feeds the reference [`crate::auth::StaticSessionStore`].
    pub sessions_spec: String,
}

impl ServerConfig {
    pub fn from_env() -> eyre::Result<Self> {
        let gemini_api_key = env::var("DAYBREAK_GEMINI_API_KEY")
            .map_err(|_| eyre::eyre!("DAYBREAK_GEMINI_API_KEY is not set"))?;

        Ok(Self {
            bind_addr: env::var("DAYBREAK_BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            staging_root: env::var("DAYBREAK_STAGING_ROOT")
                .unwrap_or_else(|_| "/tmp/daybreak-staging".to_string()),
            gemini_base_url: env::var("DAYBREAK_GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            gemini_api_key,
            gemini_model: env::var("DAYBREAK_GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            max_upload_bytes: env_u64("DAYBREAK_MAX_UPLOAD_BYTES", daybreak_staging::DEFAULT_MAX_BYTES),
            poll: PollConfig {
                interval: Duration::from_secs(env_u64("DAYBREAK_POLL_INTERVAL_SECS", 1)),
                max_attempts: env_u64("DAYBREAK_POLL_MAX_ATTEMPTS", 60) as u32,
                deadline: Duration::from_secs(env_u64("DAYBREAK_POLL_DEADLINE_SECS", 60)),
            },
            sessions_spec: env::var("DAYBREAK_SESSIONS").unwrap_or_default(),
        })
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
