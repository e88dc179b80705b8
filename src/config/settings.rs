use std::time::Duration;

use crate::cli::Args;
use crate::error::ConfigError;

use super::defaults::*;

/// Runtime settings for the compression engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Files at or below this many bytes are copied untouched
    pub target_size: u64,
    /// Ghostscript executable name or path
    pub ghostscript: String,
    /// Kill a backend run that takes longer than this
    pub backend_timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            ghostscript: DEFAULT_GHOSTSCRIPT.to_string(),
            backend_timeout: None,
        }
    }
}

impl Settings {
    /// Create settings from CLI arguments
    pub fn from_args(args: &Args) -> Self {
        let mut settings = Self {
            target_size: args.target_size,
            backend_timeout: args.timeout.map(Duration::from_secs),
            ..Default::default()
        };
        if let Some(ref gs) = args.gs {
            settings.ghostscript = gs.clone();
        }
        settings
    }

    pub fn with_target_size(mut self, target_size: u64) -> Self {
        self.target_size = target_size;
        self
    }

    pub fn with_ghostscript(mut self, ghostscript: impl Into<String>) -> Self {
        self.ghostscript = ghostscript.into();
        self
    }

    pub fn with_backend_timeout(mut self, timeout: Duration) -> Self {
        self.backend_timeout = Some(timeout);
        self
    }

    /// Check invariants the engine relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_size == 0 {
            return Err(ConfigError::ZeroTarget);
        }
        Ok(())
    }
}
