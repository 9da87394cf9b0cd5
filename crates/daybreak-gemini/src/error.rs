use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("provider API error: {0}")]
    Api(String),

    #[error("remote processing failed: {0}")]
    Processing(String),

    #[error("analysis timed out after {waited:?} with the file still processing")]
    Timeout { waited: Duration },

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("failed to read staged file: {0}")]
    Io(#[from] std::io::Error),
}
