use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("response did not conform to the assessment schema: {0}")]
    SchemaViolation(String),
}
