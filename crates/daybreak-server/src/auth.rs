//! Session lookup.
//!
//! Sessions belong to the surrounding product; the pipeline only needs to
//! resolve a bearer token to a [`Caller`]. The middleware extracts the
//! token, asks the injected [`SessionStore`], and places the caller in
//! request extensions for the handler.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use daybreak_core::models::caller::{Caller, Role};

use crate::error::ApiError;
use crate::state::AppState;

/// Resolves bearer tokens to authenticated callers.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn caller_for_token(&self, token: &str) -> Option<Caller>;
}

/// Bearer-token middleware guarding the check-in route.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?
        .to_string();

    let caller = state
        .sessions
        .caller_for_token(&token)
        .await
        .ok_or_else(|| ApiError::Unauthorized("unknown or expired session".to_string()))?;

    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}

/// Fixed token table, parsed from configuration.
#[derive(Debug, Default)]
pub struct StaticSessionStore {
    sessions: HashMap<String, Caller>,
}

impl StaticSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: impl Into<String>, caller: Caller) {
        self.sessions.insert(token.into(), caller);
    }

    /// Parse `token:role:user_uuid` entries separated by commas, e.g.
    /// `abc123:patient:6f9c…,def456:doctor:0b2d…`. An empty spec yields an
    /// empty store (every request is then unauthorized).
    pub fn from_spec(spec: &str) -> eyre::Result<Self> {
        let mut store = Self::new();
        for entry in spec.split(',').filter(|e| !e.trim().is_empty()) {
            let mut parts = entry.trim().splitn(3, ':');
            let (token, role, user_id) = match (parts.next(), parts.next(), parts.next()) {
                (Some(t), Some(r), Some(u)) => (t, r, u),
                _ => return Err(eyre::eyre!("malformed session entry: {entry}")),
            };
            let role = match role {
                "patient" => Role::Patient,
                "doctor" => Role::Doctor,
                other => return Err(eyre::eyre!("unknown role in session entry: {other}")),
            };
            let user_id = Uuid::parse_str(user_id)
                .map_err(|e| eyre::eyre!("bad user id in session entry: {e}"))?;
            store.insert(token, Caller::new(user_id, role));
        }
        Ok(store)
    }
}

#[async_trait]
impl SessionStore for StaticSessionStore {
    async fn caller_for_token(&self, token: &str) -> Option<Caller> {
        self.sessions.get(token).cloned()
    }
}
