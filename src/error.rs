use std::path::PathBuf;

use thiserror::Error;

use crate::model::Preset;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("Unreadable document {path}: {message}")]
    UnreadableDocument { path: PathBuf, message: String },

    #[error("Backend failed for {preset} preset: {message}")]
    BackendExecutionFailed { preset: Preset, message: String },

    #[error("Output already exists: {0}")]
    OutputExists(PathBuf),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CompressError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CompressError::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the failure is caused by the submitted document rather than
    /// by this process or its environment.
    pub fn is_client_error(&self) -> bool {
        matches!(self, CompressError::UnreadableDocument { .. })
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid size: {0}")]
    InvalidSize(String),

    #[error("Target size must be greater than zero")]
    ZeroTarget,
}

pub type Result<T, E = CompressError> = std::result::Result<T, E>;
