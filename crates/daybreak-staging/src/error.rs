use thiserror::Error;

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("upload of {actual} bytes exceeds the {limit} byte limit")]
    TooLarge { actual: u64, limit: u64 },

    #[error("content type not allowed: {0}")]
    UnsupportedType(String),

    #[error("failed to write staged file: {0}")]
    Io(#[from] std::io::Error),
}
