//! Trait definitions for the converter module.

use async_trait::async_trait;

use super::error::ConverterError;
use super::types::{AudioFormat, ConversionOutcome, ConversionRequest};
use crate::version::VersionCompatibility;

/// A converter that can transcode audio files.
///
/// `convert` may be called concurrently for independent files; each call
/// owns its own subprocess.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Returns the name of this converter implementation.
    fn name(&self) -> &str;

    /// Converts one file.
    ///
    /// Caller-input problems and an unlaunchable tool are returned as `Err`.
    /// A tool that runs and fails is `Ok(ConversionOutcome::Failed(..))`.
    async fn convert(&self, request: ConversionRequest)
        -> Result<ConversionOutcome, ConverterError>;

    /// Validates that the underlying tool is present and recent enough.
    async fn validate(&self) -> Result<VersionCompatibility, ConverterError>;

    /// Returns the supported output formats.
    fn supported_output_formats(&self) -> &[AudioFormat] {
        &AudioFormat::ALL
    }
}
