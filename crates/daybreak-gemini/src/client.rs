//! REST implementation of [`AnalysisProvider`] against the Gemini API.
//!
//! Four endpoints are used: media upload, file metadata (for polling),
//! `generateContent`, and file deletion. Responses are deserialized into
//! minimal wire structs; anything outside the expected shape is surfaced as
//! a parse error rather than papered over.

use std::path::Path;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analyze::{ANALYSIS_REQUEST_TEXT, CLINICAL_SYSTEM_PROMPT};
use crate::error::GeminiError;
use crate::files::{RemoteFile, RemoteFileState};
use crate::AnalysisProvider;

/// HTTP client for the Gemini file and generation APIs.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// `base_url` without a trailing slash, e.g.
    /// `https://generativelanguage.googleapis.com`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    async fn check(&self, resp: reqwest::Response) -> Result<reqwest::Response, GeminiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(GeminiError::Api(format!("{status}: {body}")))
    }
}

#[async_trait]
impl AnalysisProvider for GeminiClient {
    async fn upload_file(&self, path: &Path, mime_type: &str) -> Result<RemoteFile, GeminiError> {
        let bytes = tokio::fs::read(path).await?;

        let url = format!("{}/upload/v1beta/files?key={}", self.base_url, self.api_key);
        let resp = self
            .http
            .post(url)
            .header(CONTENT_TYPE, mime_type)
            .header("x-goog-upload-protocol", "raw")
            .body(bytes)
            .send()
            .await
            .map_err(|e| GeminiError::Api(e.to_string()))?;

        let body: UploadResponse = self
            .check(resp)
            .await?
            .json()
            .await
            .map_err(|e| GeminiError::ResponseParse(e.to_string()))?;

        debug!(file = %body.file.name, "upload accepted");

        Ok(RemoteFile {
            name: body.file.name,
            uri: body.file.uri,
            mime_type: mime_type.to_string(),
        })
    }

    async fn file_state(&self, name: &str) -> Result<RemoteFileState, GeminiError> {
        let url = format!("{}/v1beta/{}?key={}", self.base_url, name, self.api_key);
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| GeminiError::Api(e.to_string()))?;

        let file: FileResource = self
            .check(resp)
            .await?
            .json()
            .await
            .map_err(|e| GeminiError::ResponseParse(e.to_string()))?;

        RemoteFileState::parse(&file.state)
    }

    async fn generate_assessment(&self, file: &RemoteFile) -> Result<String, GeminiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let request = GenerateRequest {
            system_instruction: ContentPayload {
                role: None,
                parts: vec![Part::text(CLINICAL_SYSTEM_PROMPT)],
            },
            contents: vec![ContentPayload {
                role: Some("user".to_string()),
                parts: vec![
                    Part {
                        text: None,
                        file_data: Some(FileData {
                            file_uri: file.uri.clone(),
                            mime_type: file.mime_type.clone(),
                        }),
                    },
                    Part::text(ANALYSIS_REQUEST_TEXT),
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let resp = self
            .http
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| GeminiError::Api(e.to_string()))?;

        let body: GenerateResponse = self
            .check(resp)
            .await?
            .json()
            .await
            .map_err(|e| GeminiError::ResponseParse(e.to_string()))?;

        let candidate = body
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| GeminiError::ResponseParse("no candidates in response".to_string()))?;

        let text = candidate
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(GeminiError::ResponseParse(
                "candidate contained no text parts".to_string(),
            ));
        }

        Ok(text)
    }

    async fn delete_file(&self, name: &str) -> Result<(), GeminiError> {
        let url = format!("{}/v1beta/{}?key={}", self.base_url, name, self.api_key);
        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| GeminiError::Api(e.to_string()))?;

        self.check(resp).await?;
        Ok(())
    }
}

// ── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: FileResource,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileResource {
    name: String,
    #[serde(default)]
    uri: String,
    state: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: ContentPayload,
    contents: Vec<ContentPayload>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContentPayload {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    file_data: Option<FileData>,
}

impl Part {
    fn text(s: &str) -> Self {
        Self {
            text: Some(s.to_string()),
            file_data: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileData {
    file_uri: String,
    mime_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ContentPayload,
}
