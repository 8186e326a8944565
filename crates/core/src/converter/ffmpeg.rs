//! FFmpeg-based conversion driver.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::config::ConverterConfig;
use super::error::ConverterError;
use super::traits::Converter;
use super::types::{ConversionFailure, ConversionOutcome, ConversionRequest, FormatProfile};
use crate::version::{VersionChecker, VersionCompatibility};

/// FFmpeg-based conversion driver.
#[derive(Debug, Clone)]
pub struct FfmpegDriver {
    config: ConverterConfig,
}

impl FfmpegDriver {
    /// Creates a new driver with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Creates a driver with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ConverterConfig::default())
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Returns the program to launch for a request.
    pub fn resolve_tool(&self, request: &ConversionRequest) -> PathBuf {
        request
            .tool
            .clone()
            .unwrap_or_else(|| self.config.ffmpeg_path.clone())
    }

    /// Resolves the format profile for a request.
    pub fn resolve_profile(&self, request: &ConversionRequest) -> FormatProfile {
        let format = request.format.or(self.config.default_format);
        FormatProfile::resolve(format, &request.source)
    }

    /// Builds ffmpeg arguments for a request, program name excluded.
    ///
    /// The tool may run with a different working directory than the caller
    /// assumed, so both paths are made absolute first.
    pub fn build_args(&self, request: &ConversionRequest) -> Result<Vec<String>, ConverterError> {
        let source = absolute(&request.source)?;
        let destination = absolute(&request.destination)?;
        let profile = self.resolve_profile(request);

        let mut args = vec!["-i".to_string(), source.to_string_lossy().to_string()];

        args.extend(profile.codec_args.iter().map(|s| s.to_string()));

        // Bitrate is passed through to the filters and encoder, otherwise
        // players report a duration that does not match the audio.
        args.extend(["-abr".to_string(), "true".to_string()]);

        args.extend(profile.quality_args.iter().map(|s| s.to_string()));

        args.extend(["-v".to_string(), "debug".to_string()]);

        args.push(destination.to_string_lossy().to_string());

        Ok(args)
    }

    /// Runs ffmpeg for a request and interprets the exit status.
    async fn run_conversion(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionOutcome, ConverterError> {
        let args = self.build_args(request)?;
        let program = self.resolve_tool(request);
        let start = Instant::now();

        debug!(
            program = %program.display(),
            args = ?args,
            "Launching ffmpeg"
        );

        // Both pipes are drained while the process runs.
        let output = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                    ConverterError::ToolNotFound {
                        path: program.clone(),
                    }
                }
                _ => ConverterError::Io(e),
            })?;

        let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
        captured.push_str(&String::from_utf8_lossy(&output.stderr));

        let duration_ms = start.elapsed().as_millis() as u64;

        if !output.status.success() {
            let exit_code = output.status.code();
            warn!(
                source = %request.source.display(),
                exit_code = ?exit_code,
                duration_ms,
                "ffmpeg conversion failed"
            );
            return Ok(ConversionOutcome::Failed(ConversionFailure {
                exit_code,
                args,
                output: captured,
            }));
        }

        info!(
            source = %request.source.display(),
            destination = %request.destination.display(),
            duration_ms,
            output_bytes = captured.len(),
            "ffmpeg conversion finished"
        );

        Ok(ConversionOutcome::Succeeded)
    }
}

fn absolute(path: &Path) -> Result<PathBuf, ConverterError> {
    std::path::absolute(path).map_err(|source| ConverterError::InvalidPath {
        path: path.to_path_buf(),
        source,
    })
}

#[async_trait]
impl Converter for FfmpegDriver {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn convert(
        &self,
        request: ConversionRequest,
    ) -> Result<ConversionOutcome, ConverterError> {
        self.run_conversion(&request).await
    }

    async fn validate(&self) -> Result<VersionCompatibility, ConverterError> {
        VersionChecker::from_config(&self.config)
            .require_compatible()
            .await
    }
}
