//! FFmpeg version detection.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

use super::types::{VersionCompatibility, VersionEvidence};
use crate::converter::{ConverterConfig, ConverterError, DEFAULT_FFMPEG};

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ffmpeg version \w?(\d+\.)?(\d+)").expect("valid version regex"));

static COPYRIGHT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Copyright \(c\) \d{4}-202\d").expect("valid copyright regex")
});

/// Interprets the output of `ffmpeg -version`.
///
/// Builds that omit the standard banner (git snapshots report
/// `ffmpeg version N-...`) fall back to the copyright range.
pub fn parse_version_output(output: &str) -> VersionCompatibility {
    if let Some(found) = VERSION_RE.find(output) {
        // "ffmpeg version n4.3" -> "4.3"
        let numeric: String = found
            .as_str()
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        if let Ok(version) = numeric.parse::<f64>() {
            return VersionCompatibility::parsed(version);
        }
    }

    if COPYRIGHT_RE.is_match(output) {
        return VersionCompatibility::copyright_fallback();
    }

    VersionCompatibility::undetermined()
}

/// Checks whether an FFmpeg installation is recent enough.
#[derive(Debug, Clone)]
pub struct VersionChecker {
    ffmpeg_path: PathBuf,
    skip_check: bool,
}

impl VersionChecker {
    /// Creates a checker for the given tool location.
    ///
    /// An unset location uses the bare tool name.
    pub fn new(tool: Option<&Path>, skip_check: bool) -> Self {
        Self {
            ffmpeg_path: tool
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FFMPEG)),
            skip_check,
        }
    }

    /// Creates a checker from converter configuration.
    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::new(Some(config.ffmpeg_path.as_path()), config.skip_version_check)
    }

    /// Returns the tool location this checker queries.
    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg_path
    }

    /// Runs `ffmpeg -version` and applies the compatibility policy.
    ///
    /// Blocks until the tool exits. A tool that cannot be spawned yields a
    /// not-found result rather than an error.
    pub fn check(&self) -> VersionCompatibility {
        if self.skip_check {
            debug!(path = %self.ffmpeg_path.display(), "Skipping FFmpeg version check");
            return VersionCompatibility::skipped();
        }

        let output = match Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                warn!(path = %self.ffmpeg_path.display(), error = %e, "FFmpeg could not be started");
                return VersionCompatibility::not_found();
            }
        };

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        let result = parse_version_output(&text);
        if result.compatible {
            info!(
                path = %self.ffmpeg_path.display(),
                evidence = %result.evidence,
                version = ?result.detected_version,
                "FFmpeg version accepted"
            );
        } else {
            warn!(
                path = %self.ffmpeg_path.display(),
                evidence = %result.evidence,
                version = ?result.detected_version,
                "FFmpeg version rejected"
            );
        }

        result
    }

    /// Runs [`check`](Self::check) on the blocking thread pool.
    pub async fn check_async(&self) -> Result<VersionCompatibility, ConverterError> {
        let checker = self.clone();
        tokio::task::spawn_blocking(move || checker.check())
            .await
            .map_err(|e| ConverterError::Io(std::io::Error::other(e)))
    }

    /// Checks the tool and converts a negative result into an error.
    pub async fn require_compatible(&self) -> Result<VersionCompatibility, ConverterError> {
        let result = self.check_async().await?;
        if result.compatible {
            return Ok(result);
        }

        let reason = result.warning().unwrap_or_default();
        match result.evidence {
            VersionEvidence::NotFound => Err(ConverterError::ToolNotFound {
                path: self.ffmpeg_path.clone(),
            }),
            _ => Err(ConverterError::incompatible_version(reason)),
        }
    }
}
