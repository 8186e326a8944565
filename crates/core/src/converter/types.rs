//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::error::ConverterError;

/// Output audio format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// MPEG Audio Layer III (default)
    #[default]
    Mp3,
    /// Free Lossless Audio Codec
    Flac,
    /// Ogg Vorbis
    Ogg,
    /// Opus
    Opus,
    /// AAC in an MPEG-4 container
    M4a,
    /// WAVE
    Wav,
}

impl AudioFormat {
    /// All supported formats.
    pub const ALL: [AudioFormat; 6] = [
        Self::Mp3,
        Self::Flac,
        Self::Ogg,
        Self::Opus,
        Self::M4a,
        Self::Wav,
    ];

    /// Returns the name of this format, which is also its file extension.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
            Self::Ogg => "ogg",
            Self::Opus => "opus",
            Self::M4a => "m4a",
            Self::Wav => "wav",
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// Returns the codec arguments for this format.
    ///
    /// Opus output from an Opus source is stream-copied instead of re-encoded.
    pub fn codec_args(&self, source_is_opus: bool) -> &'static [&'static str] {
        match self {
            Self::Mp3 => &["-codec:a", "libmp3lame"],
            Self::Flac => &["-codec:a", "flac"],
            Self::Ogg => &["-codec:a", "libvorbis"],
            Self::Opus if source_is_opus => &["-vn", "-c:a", "copy"],
            Self::Opus => &["-c:a", "libopus"],
            Self::M4a => &["-codec:a", "aac", "-vn"],
            Self::Wav => &[],
        }
    }

    /// Returns the quality arguments for this format.
    ///
    /// Vorbis quality is inverted (higher is better) and its default of 3 is
    /// too low for lossy sources, so ogg uses 5. AAC targets a bitrate and
    /// takes no quality scalar. Everything else treats 0 as the default.
    pub fn quality_args(&self) -> &'static [&'static str] {
        match self {
            Self::Ogg => &["-q:a", "5"],
            Self::M4a => &[],
            _ => &["-q:a", "0"],
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioFormat {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| ConverterError::unsupported_format(s))
    }
}

/// Codec and quality arguments for one output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatProfile {
    /// Format this profile was resolved for.
    pub format: AudioFormat,
    /// Codec selection arguments.
    pub codec_args: &'static [&'static str],
    /// Quality arguments.
    pub quality_args: &'static [&'static str],
}

impl FormatProfile {
    /// Resolves the profile for a requested format and source file.
    ///
    /// An unset format resolves to mp3.
    pub fn resolve(format: Option<AudioFormat>, source: &Path) -> Self {
        let format = format.unwrap_or_default();
        let source_is_opus = source
            .file_name()
            .is_some_and(|name| name.to_string_lossy().ends_with(".opus"));

        Self {
            format,
            codec_args: format.codec_args(source_is_opus),
            quality_args: format.quality_args(),
        }
    }

    /// Whether this profile copies the audio stream without re-encoding.
    pub fn is_stream_copy(&self) -> bool {
        self.codec_args.windows(2).any(|w| w == ["-c:a", "copy"])
    }
}

/// A single-file conversion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// Downloaded source file.
    pub source: PathBuf,
    /// Converted destination file.
    pub destination: PathBuf,
    /// Tool location override; falls back to the configured path.
    pub tool: Option<PathBuf>,
    /// Output format; unset means mp3.
    pub format: Option<AudioFormat>,
}

impl ConversionRequest {
    /// Creates a request with the default tool and format.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            tool: None,
            format: None,
        }
    }

    /// Sets the output format.
    pub fn with_format(mut self, format: AudioFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets the output format from its name, failing on unknown names.
    pub fn with_format_name(self, name: &str) -> Result<Self, ConverterError> {
        Ok(self.with_format(name.parse()?))
    }

    /// Sets the tool location.
    pub fn with_tool(mut self, tool: impl Into<PathBuf>) -> Self {
        self.tool = Some(tool.into());
        self
    }
}

/// Result of running the tool for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// Tool exited with code 0.
    Succeeded,
    /// Tool exited non-zero or was killed.
    Failed(ConversionFailure),
}

impl ConversionOutcome {
    /// Whether the conversion succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Returns the failure details, if any.
    pub fn failure(&self) -> Option<&ConversionFailure> {
        match self {
            Self::Succeeded => None,
            Self::Failed(failure) => Some(failure),
        }
    }
}

/// Diagnostic details of a failed tool run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionFailure {
    /// Exit code; `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Arguments passed to the tool, program name excluded.
    pub args: Vec<String>,
    /// Captured stdout followed by stderr.
    pub output: String,
}

impl fmt::Display for ConversionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exit_code {
            Some(code) => writeln!(f, "ffmpeg returned an error ({code})")?,
            None => writeln!(f, "ffmpeg returned an error (signal)")?,
        }
        writeln!(f, "ffmpeg arguments: \"{}\"", self.args.join(" "))?;
        writeln!(f, "ffmpeg gave this output:")?;
        writeln!(f, "=====")?;
        writeln!(f, "{}", self.output)?;
        writeln!(f, "=====")
    }
}
