//! daybreak-gemini
//!
//! Client for the external multimodal analysis provider. A check-in video is
//! uploaded to the provider's transient file storage, polled until it leaves
//! the `PROCESSING` state, analyzed with a single constrained-JSON generation
//! call, and then deleted from the provider — on the success path and on
//! every failure path alike.

pub mod analyze;
pub mod client;
pub mod error;
pub mod files;

use std::path::Path;

use async_trait::async_trait;

use crate::error::GeminiError;
use crate::files::{RemoteFile, RemoteFileState};

/// Operations the analysis pipeline needs from the remote provider.
///
/// [`client::GeminiClient`] is the real implementation; tests inject
/// scripted fakes to drive the state machine without network access.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Upload a local file with its declared mime type.
    async fn upload_file(&self, path: &Path, mime_type: &str) -> Result<RemoteFile, GeminiError>;

    /// Fetch the current processing state of an uploaded file.
    async fn file_state(&self, name: &str) -> Result<RemoteFileState, GeminiError>;

    /// Run one generation call against an `ACTIVE` file and return the raw
    /// model output text.
    async fn generate_assessment(&self, file: &RemoteFile) -> Result<String, GeminiError>;

    /// Delete an uploaded file from the provider's storage.
    async fn delete_file(&self, name: &str) -> Result<(), GeminiError>;
}
