//! daybreak-staging
//!
//! Ephemeral staging for uploaded check-in videos. An upload is written to a
//! request-unique path and handed back as a [`StagedVideo`] guard; the file
//! is removed when the guard drops, on every exit path. Removal failures are
//! logged and swallowed so cleanup can never mask the primary outcome.

pub mod error;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::StagingError;

/// Default upload cap: 100 MiB.
pub const DEFAULT_MAX_BYTES: u64 = 100 * 1024 * 1024;

/// Content types accepted for check-in videos.
pub const ALLOWED_VIDEO_TYPES: &[&str] = &["video/mp4", "video/webm", "video/quicktime"];

/// Size and content-type constraints applied before anything is written.
#[derive(Debug, Clone)]
pub struct UploadLimits {
    pub max_bytes: u64,
    pub allowed_types: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            allowed_types: ALLOWED_VIDEO_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl UploadLimits {
    /// Check an upload against the limits without touching the filesystem.
    pub fn check(&self, len: u64, content_type: &str) -> Result<(), StagingError> {
        if !self.allowed_types.iter().any(|t| t == content_type) {
            return Err(StagingError::UnsupportedType(content_type.to_string()));
        }
        if len > self.max_bytes {
            return Err(StagingError::TooLarge {
                actual: len,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

/// A directory where uploads are staged for the duration of one request.
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
    limits: UploadLimits,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>, limits: UploadLimits) -> Self {
        Self {
            root: root.into(),
            limits,
        }
    }

    pub fn limits(&self) -> &UploadLimits {
        &self.limits
    }

    /// Validate and write an upload to a request-unique path.
    ///
    /// Returns the [`StagedVideo`] guard that removes the file on drop.
    /// Filenames embed a fresh UUID, so concurrent check-ins never collide.
    pub async fn stage(&self, bytes: &[u8], content_type: &str) -> Result<StagedVideo, StagingError> {
        self.limits.check(bytes.len() as u64, content_type)?;

        tokio::fs::create_dir_all(&self.root).await?;

        let filename = format!(
            "checkin-{}.{}",
            Uuid::new_v4(),
            extension_for_type(content_type)
        );
        let path = self.root.join(filename);

        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), size = bytes.len(), "staged upload");

        Ok(StagedVideo { path })
    }
}

/// Scoped handle to a staged file. Dropping it removes the file.
#[derive(Debug)]
pub struct StagedVideo {
    path: PathBuf,
}

impl StagedVideo {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedVideo {
    fn drop(&mut self) {
        // Synchronous removal: Drop cannot await, and the file is small
        // enough that blocking briefly on unlink is acceptable.
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed staged file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to remove staged file");
            }
        }
    }
}

/// Map an allowed content type to a file extension for the staged name.
fn extension_for_type(content_type: &str) -> &'static str {
    match content_type {
        "video/webm" => "webm",
        "video/quicktime" => "mov",
        _ => "mp4",
    }
}
