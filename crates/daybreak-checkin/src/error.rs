use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CheckinError {
    #[error("patient role required for check-ins")]
    Forbidden,

    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Analysis failed: {0}")]
    Analysis(String),

    #[error("assessment validation failed: {0}")]
    InvalidAssessment(String),

    #[error("staging failed: {0}")]
    Staging(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<daybreak_staging::error::StagingError> for CheckinError {
    fn from(e: daybreak_staging::error::StagingError) -> Self {
        use daybreak_staging::error::StagingError;
        match e {
            StagingError::TooLarge { .. } | StagingError::UnsupportedType(_) => {
                CheckinError::InvalidUpload(e.to_string())
            }
            StagingError::Io(_) => CheckinError::Staging(e.to_string()),
        }
    }
}
