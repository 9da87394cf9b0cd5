//! The structured clinical assessment derived from a check-in video.
//!
//! This is the only artifact of a check-in that outlives the request. The
//! model is asked for constrained JSON matching this shape; anything that
//! does not parse and range-check cleanly is rejected outright — no
//! coercion, no default filling, no partial acceptance.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Inclusive bounds for the self-reported/observed mood score.
pub const MOOD_SCORE_MIN: u8 = 1;
pub const MOOD_SCORE_MAX: u8 = 10;

/// Mood scores strictly below this threshold raise the aggregate risk flag
/// even when no boolean indicator is set.
pub const LOW_MOOD_THRESHOLD: u8 = 3;

/// Observed latency between prompt and speech onset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechLatency {
    Normal,
    Delayed,
    Rapid,
}

/// Observed affect presentation, mental-status-exam style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Affect {
    Flat,
    Restricted,
    Congruent,
    Labile,
}

/// Observed eye contact with the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EyeContact {
    Steady,
    Intermittent,
    Avoidant,
}

/// A validated clinical assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    /// Mood score, 1 (worst) to 10 (best).
    pub mood_score: u8,
    pub suicidal_ideation: bool,
    pub self_harm_indicators: bool,
    pub severe_distress: bool,
    pub speech_latency: SpeechLatency,
    pub affect: Affect,
    pub eye_contact: EyeContact,
    /// Short free-text clinical summary. Must be non-empty.
    pub clinical_summary: String,
}

impl Assessment {
    /// Parse and validate raw model output into an `Assessment`.
    ///
    /// Missing fields, wrong types, and out-of-vocabulary biomarker values
    /// are rejected by the strict parse; mood range and summary emptiness
    /// are checked afterwards. Every rejection carries a human-readable
    /// reason.
    pub fn from_model_output(raw: &str) -> Result<Self, CoreError> {
        let json = strip_code_fences(raw);

        let assessment: Assessment = serde_json::from_str(json)
            .map_err(|e| CoreError::SchemaViolation(e.to_string()))?;

        assessment.validate()?;
        Ok(assessment)
    }

    /// Check the range constraints the type system cannot express.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.mood_score < MOOD_SCORE_MIN || self.mood_score > MOOD_SCORE_MAX {
            return Err(CoreError::SchemaViolation(format!(
                "mood_score {} is outside range [{MOOD_SCORE_MIN}, {MOOD_SCORE_MAX}]",
                self.mood_score,
            )));
        }
        if self.clinical_summary.trim().is_empty() {
            return Err(CoreError::SchemaViolation(
                "clinical_summary must be a non-empty string".to_string(),
            ));
        }
        Ok(())
    }

    /// Aggregate risk flag: true iff any boolean indicator is set or the
    /// mood score falls below [`LOW_MOOD_THRESHOLD`].
    pub fn risk_flag(&self) -> bool {
        self.suicidal_ideation
            || self.self_harm_indicators
            || self.severe_distress
            || self.mood_score < LOW_MOOD_THRESHOLD
    }
}

/// Strip a wrapping markdown code fence from model output, if present.
///
/// Generation requests JSON output, but models occasionally fence the
/// payload anyway (```json ... ```). Only the fence is removed; the payload
/// itself still has to parse strictly.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop a language tag like "json" on the opening fence line.
    match inner.split_once('\n') {
        Some((first_line, body)) if !first_line.trim().is_empty() => body.trim(),
        _ => inner.trim(),
    }
}
