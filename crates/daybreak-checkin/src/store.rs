//! Persistence seam for daily logs.
//!
//! Durable storage is an external collaborator: the orchestrator only needs
//! a single insert. [`InMemoryLogStore`] is the reference implementation
//! backing the server binary and the tests.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use daybreak_core::models::daily_log::DailyLog;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to persist daily log: {0}")]
    Backend(String),
}

/// Insert-only persistence for daily check-in records.
#[async_trait]
pub trait DailyLogStore: Send + Sync {
    async fn create(
        &self,
        user_id: Uuid,
        mood_score: u8,
        risk_flag: bool,
        analysis: serde_json::Value,
    ) -> Result<DailyLog, StoreError>;
}

/// Reference store keeping logs in memory.
#[derive(Debug, Default)]
pub struct InMemoryLogStore {
    logs: Mutex<Vec<DailyLog>>,
}

impl InMemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all persisted logs, oldest first.
    pub async fn logs(&self) -> Vec<DailyLog> {
        self.logs.lock().await.clone()
    }
}

#[async_trait]
impl DailyLogStore for InMemoryLogStore {
    async fn create(
        &self,
        user_id: Uuid,
        mood_score: u8,
        risk_flag: bool,
        analysis: serde_json::Value,
    ) -> Result<DailyLog, StoreError> {
        let log = DailyLog {
            id: Uuid::new_v4(),
            user_id,
            mood_score,
            risk_flag,
            analysis,
            created_at: jiff::Timestamp::now(),
        };
        self.logs.lock().await.push(log.clone());
        Ok(log)
    }
}
