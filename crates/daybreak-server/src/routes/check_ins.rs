//! The check-in endpoint.
//!
//! Accepts one multipart upload with a `video` field, runs the pipeline,
//! and returns the persisted record inside the uniform success envelope.
//! Everything else — staging, analysis, validation, cleanup — happens in
//! `daybreak-checkin`.

use axum::extract::{Multipart, State};
use axum::{Extension, Json};
use serde::Serialize;
use uuid::Uuid;

use daybreak_checkin::VideoUpload;
use daybreak_core::models::caller::Caller;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CheckinResponse {
    pub success: bool,
    pub data: CheckinData,
}

/// Wire shape matches the product's existing API, hence camelCase.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinData {
    pub id: Uuid,
    pub mood_score: u8,
    pub risk_flag: bool,
    pub analysis: serde_json::Value,
    pub created_at: jiff::Timestamp,
}

pub async fn create_check_in(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    mut multipart: Multipart,
) -> Result<Json<CheckinResponse>, ApiError> {
    let mut upload: Option<VideoUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("video") {
            continue;
        }
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read video field: {e}")))?;
        upload = Some(VideoUpload {
            bytes: bytes.to_vec(),
            content_type,
        });
    }

    let upload = upload.ok_or_else(|| ApiError::BadRequest("missing video field".to_string()))?;

    let log = state.service.submit(&caller, upload).await?;

    Ok(Json(CheckinResponse {
        success: true,
        data: CheckinData {
            id: log.id,
            mood_score: log.mood_score,
            risk_flag: log.risk_flag,
            analysis: log.analysis,
            created_at: log.created_at,
        },
    }))
}
