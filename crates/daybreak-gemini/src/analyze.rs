//! The end-to-end analysis operation: upload, bounded poll, generation,
//! guaranteed remote deletion.

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::error::GeminiError;
use crate::files::{RemoteFile, RemoteFileState};
use crate::AnalysisProvider;

/// Fixed system instruction for the clinical analysis call.
///
/// The schema described here must stay in lockstep with
/// `daybreak_core::models::assessment::Assessment`.
pub const CLINICAL_SYSTEM_PROMPT: &str = "\
You are a clinical observation assistant analyzing a patient's daily \
video check-in. Assess the patient's presentation from speech, tone, and \
visible behavior. Respond with a single JSON object and nothing else, \
using exactly these fields:

- \"mood_score\": integer from 1 (worst) to 10 (best)
- \"suicidal_ideation\": boolean, any expressed or implied suicidal thought
- \"self_harm_indicators\": boolean, any visible or stated self-harm signs
- \"severe_distress\": boolean, acute agitation, panic, or despair
- \"speech_latency\": one of \"normal\", \"delayed\", \"rapid\"
- \"affect\": one of \"flat\", \"restricted\", \"congruent\", \"labile\"
- \"eye_contact\": one of \"steady\", \"intermittent\", \"avoidant\"
- \"clinical_summary\": two to three sentences of neutral clinical language

Do not diagnose. Do not address the patient. Report only what is observable.";

/// User-turn text accompanying the file reference in the generation call.
pub(crate) const ANALYSIS_REQUEST_TEXT: &str =
    "Analyze this daily check-in video and produce the structured assessment.";

/// Bounds on the processing poll loop.
///
/// The provider gives no completion callback, so the client polls. Both an
/// attempt cap and an overall deadline apply; whichever trips first ends the
/// wait with [`GeminiError::Timeout`].
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
    pub deadline: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 60,
            deadline: Duration::from_secs(60),
        }
    }
}

/// Upload a staged video, wait for processing, run one generation call, and
/// return the raw model output.
///
/// The remote file is deleted before this function returns, whatever the
/// outcome of polling or generation. Deletion failures are logged and
/// swallowed — the provider expires transient files on its own schedule, and
/// a failed delete must never mask the primary result. Local staging cleanup
/// is the caller's scope and runs independently of anything here.
pub async fn analyze_video(
    provider: &dyn AnalysisProvider,
    path: &Path,
    mime_type: &str,
    poll: &PollConfig,
) -> Result<String, GeminiError> {
    let file = provider.upload_file(path, mime_type).await?;
    info!(file = %file.name, mime_type, "uploaded check-in video to provider");

    let outcome = wait_and_generate(provider, &file, poll).await;

    if let Err(e) = provider.delete_file(&file.name).await {
        warn!(file = %file.name, error = %e, "failed to delete remote file");
    }

    outcome
}

/// Poll until the file is `ACTIVE`, then run the generation call.
async fn wait_and_generate(
    provider: &dyn AnalysisProvider,
    file: &RemoteFile,
    poll: &PollConfig,
) -> Result<String, GeminiError> {
    let started = Instant::now();

    for attempt in 0..poll.max_attempts {
        match provider.file_state(&file.name).await? {
            RemoteFileState::Active => {
                info!(file = %file.name, attempt, "file active, requesting assessment");
                return provider.generate_assessment(file).await;
            }
            RemoteFileState::Failed => {
                return Err(GeminiError::Processing(
                    "provider reported FAILED state for the uploaded video".to_string(),
                ));
            }
            RemoteFileState::Processing => {}
        }

        if started.elapsed() >= poll.deadline {
            break;
        }
        tokio::time::sleep(poll.interval).await;
    }

    Err(GeminiError::Timeout {
        waited: started.elapsed(),
    })
}
