//! Mock converter for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::converter::{
    ConversionFailure, ConversionOutcome, ConversionRequest, Converter, ConverterError,
};
use crate::version::VersionCompatibility;

/// A recorded conversion request for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedConversion {
    /// The request that was submitted.
    pub request: ConversionRequest,
    /// Whether the conversion succeeded.
    pub success: bool,
}

/// Mock implementation of the Converter trait.
///
/// Provides controllable behavior for testing:
/// - Track conversion requests for assertions
/// - Script a failing exit code per source file
/// - Inject errors
/// - Simulate conversion time
///
/// # Example
///
/// ```rust,ignore
/// use tonearm_core::testing::MockConverter;
///
/// let converter = MockConverter::new();
/// converter.fail_source("/downloads/broken.webm", 1, "Invalid data").await;
///
/// let outcome = converter.convert(request).await?;
///
/// let conversions = converter.recorded_conversions().await;
/// assert_eq!(conversions.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockConverter {
    /// Recorded conversions.
    conversions: Arc<RwLock<Vec<RecordedConversion>>>,
    /// Scripted failures by source path.
    failures: Arc<RwLock<HashMap<PathBuf, (i32, String)>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<ConverterError>>>,
    /// Simulated conversion duration in milliseconds.
    conversion_duration_ms: Arc<RwLock<u64>>,
    /// Result returned by `validate`.
    compatibility: Arc<RwLock<VersionCompatibility>>,
}

impl Default for MockConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConverter {
    /// Create a new mock converter.
    pub fn new() -> Self {
        Self {
            conversions: Arc::new(RwLock::new(Vec::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            next_error: Arc::new(RwLock::new(None)),
            conversion_duration_ms: Arc::new(RwLock::new(0)),
            compatibility: Arc::new(RwLock::new(VersionCompatibility::parsed(6.0))),
        }
    }

    /// Get all recorded conversions.
    pub async fn recorded_conversions(&self) -> Vec<RecordedConversion> {
        self.conversions.read().await.clone()
    }

    /// Clear recorded conversions.
    pub async fn clear_recorded(&self) {
        self.conversions.write().await.clear();
    }

    /// Get the number of conversions performed.
    pub async fn conversion_count(&self) -> usize {
        self.conversions.read().await.len()
    }

    /// Make conversions of `source` exit with the given code and output.
    pub async fn fail_source(&self, source: impl AsRef<Path>, exit_code: i32, output: &str) {
        self.failures
            .write()
            .await
            .insert(source.as_ref().to_path_buf(), (exit_code, output.to_string()));
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: ConverterError) {
        *self.next_error.write().await = Some(error);
    }

    /// Clear any pending error.
    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
    }

    /// Set the simulated conversion duration.
    pub async fn set_conversion_duration(&self, duration: Duration) {
        *self.conversion_duration_ms.write().await = duration.as_millis() as u64;
    }

    /// Set the result returned by `validate`.
    pub async fn set_compatibility(&self, compatibility: VersionCompatibility) {
        *self.compatibility.write().await = compatibility;
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<ConverterError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn convert(
        &self,
        request: ConversionRequest,
    ) -> Result<ConversionOutcome, ConverterError> {
        if let Some(err) = self.take_error().await {
            self.conversions.write().await.push(RecordedConversion {
                request,
                success: false,
            });
            return Err(err);
        }

        // Simulate conversion time
        let duration_ms = *self.conversion_duration_ms.read().await;
        if duration_ms > 0 {
            tokio::time::sleep(Duration::from_millis(duration_ms)).await;
        }

        let outcome = match self.failures.read().await.get(&request.source) {
            Some((exit_code, output)) => ConversionOutcome::Failed(ConversionFailure {
                exit_code: Some(*exit_code),
                args: vec![
                    "-i".to_string(),
                    request.source.to_string_lossy().to_string(),
                    request.destination.to_string_lossy().to_string(),
                ],
                output: output.clone(),
            }),
            None => ConversionOutcome::Succeeded,
        };

        self.conversions.write().await.push(RecordedConversion {
            request,
            success: outcome.is_success(),
        });

        Ok(outcome)
    }

    async fn validate(&self) -> Result<VersionCompatibility, ConverterError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(*self.compatibility.read().await)
    }
}
