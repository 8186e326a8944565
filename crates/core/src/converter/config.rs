//! Configuration for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::types::AudioFormat;

/// Configuration for the FFmpeg-based driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Path to ffmpeg binary; a bare name is resolved through `PATH`.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// Skip the version check when validating.
    #[serde(default)]
    pub skip_version_check: bool,

    /// Format used when a request does not name one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_format: Option<AudioFormat>,
}

/// Tool name used when no location is configured.
pub const DEFAULT_FFMPEG: &str = "ffmpeg";

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from(DEFAULT_FFMPEG)
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            skip_version_check: false,
            default_format: None,
        }
    }
}

impl ConverterConfig {
    /// Creates a new config with a custom ffmpeg path.
    pub fn with_path(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            ..Default::default()
        }
    }

    /// Sets whether the version check is skipped.
    pub fn with_skip_version_check(mut self, skip: bool) -> Self {
        self.skip_version_check = skip;
        self
    }

    /// Sets the default output format.
    pub fn with_default_format(mut self, format: AudioFormat) -> Self {
        self.default_format = Some(format);
        self
    }
}
