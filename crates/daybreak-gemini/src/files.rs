//! Remote file lifecycle types.
//!
//! The provider reports file state as a string; it is parsed into a tagged
//! enum at the API boundary so the poll loop can match exhaustively instead
//! of comparing strings.

use crate::error::GeminiError;

/// Processing state of an uploaded file, as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFileState {
    Processing,
    Active,
    Failed,
}

impl RemoteFileState {
    /// Parse the provider's state string. Unknown states are an API error,
    /// not something to silently keep polling on.
    pub fn parse(state: &str) -> Result<Self, GeminiError> {
        match state {
            "PROCESSING" => Ok(Self::Processing),
            "ACTIVE" => Ok(Self::Active),
            "FAILED" => Ok(Self::Failed),
            other => Err(GeminiError::Api(format!(
                "unrecognized file state: {other}"
            ))),
        }
    }
}

/// Reference to a file living in the provider's transient storage.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    /// Resource name used for polling and deletion, e.g. `files/abc-123`.
    pub name: String,
    /// URI passed back into the generation call.
    pub uri: String,
    pub mime_type: String,
}
