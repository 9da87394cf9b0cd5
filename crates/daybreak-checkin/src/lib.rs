//! daybreak-checkin
//!
//! The check-in orchestrator. One public operation takes an authenticated
//! caller and an uploaded video, runs staging, remote analysis, and schema
//! validation, and persists only the derived assessment. The staged file and
//! the provider-side copy are both gone by the time this returns, success or
//! failure — the uploaded media never outlives the request.

pub mod error;
pub mod store;

use std::sync::Arc;

use tracing::info;

use daybreak_core::models::assessment::Assessment;
use daybreak_core::models::caller::{Caller, Role};
use daybreak_core::models::daily_log::DailyLog;
use daybreak_gemini::analyze::{analyze_video, PollConfig};
use daybreak_gemini::AnalysisProvider;
use daybreak_staging::StagingArea;

use crate::error::CheckinError;
use crate::store::DailyLogStore;

/// An uploaded check-in video as received from the HTTP layer.
#[derive(Debug)]
pub struct VideoUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Orchestrates one check-in end to end. Collaborators are injected, never
/// reached through globals, so every seam can be faked in tests.
pub struct CheckinService {
    provider: Arc<dyn AnalysisProvider>,
    store: Arc<dyn DailyLogStore>,
    staging: StagingArea,
    poll: PollConfig,
}

impl CheckinService {
    pub fn new(
        provider: Arc<dyn AnalysisProvider>,
        store: Arc<dyn DailyLogStore>,
        staging: StagingArea,
        poll: PollConfig,
    ) -> Self {
        Self {
            provider,
            store,
            staging,
            poll,
        }
    }

    /// Run one check-in: authorize, stage, analyze, validate, persist.
    ///
    /// Authorization is checked before any staging or provider work. Any
    /// failure up to persistence aborts with nothing written; the staged
    /// file's guard unwinds on every path, independently of the remote
    /// deletion performed inside the analysis client.
    pub async fn submit(
        &self,
        caller: &Caller,
        upload: VideoUpload,
    ) -> Result<DailyLog, CheckinError> {
        if caller.role != Role::Patient {
            return Err(CheckinError::Forbidden);
        }

        let staged = self.staging.stage(&upload.bytes, &upload.content_type).await?;

        let raw = analyze_video(
            self.provider.as_ref(),
            staged.path(),
            &upload.content_type,
            &self.poll,
        )
        .await
        .map_err(|e| CheckinError::Analysis(e.to_string()))?;

        let assessment = Assessment::from_model_output(&raw)
            .map_err(|e| CheckinError::InvalidAssessment(e.to_string()))?;

        let risk_flag = assessment.risk_flag();
        let analysis = serde_json::to_value(&assessment)?;

        let log = self
            .store
            .create(caller.user_id, assessment.mood_score, risk_flag, analysis)
            .await?;

        info!(
            user_id = %caller.user_id,
            mood_score = assessment.mood_score,
            risk_flag,
            "check-in recorded"
        );

        Ok(log)
    }
}
