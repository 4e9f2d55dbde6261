//! Error taxonomy for narration decoding and frame baking.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Convenience result type used across the crate.
pub type VizResult<T> = Result<T, VizError>;

/// Top-level error type.
///
/// Per-frame analysis skips are not errors; see [`crate::frame::SkipReason`].
#[derive(Error, Debug)]
pub enum VizError {
    /// Narration audio path does not resolve to an existing file.
    #[error("audio file not found at: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// Compressed audio could not be parsed.
    #[error("error processing audio file {}: {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parameter validation failure.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Frame driver used outside its lifecycle.
    #[error("lifecycle error: {0}")]
    Lifecycle(String),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl VizError {
    /// Build a [`VizError::Decode`] for `path`.
    pub fn decode(path: &Path, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn lifecycle(msg: impl Into<String>) -> Self {
        Self::Lifecycle(msg.into())
    }
}
