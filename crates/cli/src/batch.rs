//! Converting many files at once.
//!
//! Each file is an independent `convert` call; up to `max_parallel` of them
//! run at the same time. Results keep the order of the inputs. A request
//! whose destination repeats an earlier one is rejected without running.

use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use tonearm_core::{AudioFormat, ConversionOutcome, ConversionRequest, Converter};

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchResult {
    Converted,
    /// The tool ran and failed; holds the rendered diagnostics.
    Failed(String),
    /// The request was rejected before the tool ran.
    Rejected(String),
    TimedOut,
}

#[derive(Debug, Clone)]
pub struct BatchItem {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub result: BatchResult,
}

#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub items: Vec<BatchItem>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.result == BatchResult::Converted)
            .count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &BatchItem> {
        self.items
            .iter()
            .filter(|item| item.result != BatchResult::Converted)
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed().next().is_none()
    }
}

/// Builds one request per input, writing `<out_dir>/<stem>.<ext>`.
pub fn plan_requests(
    inputs: &[PathBuf],
    out_dir: &Path,
    format: Option<AudioFormat>,
    tool: Option<&Path>,
) -> Vec<ConversionRequest> {
    let extension = format.unwrap_or_default().extension();

    inputs
        .iter()
        .map(|input| {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "output".to_string());
            let mut request =
                ConversionRequest::new(input, out_dir.join(format!("{stem}.{extension}")));
            request.format = format;
            request.tool = tool.map(Path::to_path_buf);
            request
        })
        .collect()
}

/// Runs every request against `converter`.
///
/// A `timeout` drops the pending conversion, which kills its subprocess.
pub async fn run_batch<C>(
    converter: &C,
    requests: Vec<ConversionRequest>,
    max_parallel: usize,
    timeout: Option<Duration>,
) -> BatchSummary
where
    C: Converter + ?Sized,
{
    let mut destinations = HashSet::new();
    let planned: Vec<(ConversionRequest, bool)> = requests
        .into_iter()
        .map(|request| {
            let duplicate = !destinations.insert(request.destination.clone());
            (request, duplicate)
        })
        .collect();

    let items = stream::iter(planned)
        .map(|(request, duplicate)| async move {
            let source = request.source.clone();
            let destination = request.destination.clone();

            if duplicate {
                warn!(
                    source = %source.display(),
                    destination = %destination.display(),
                    "Destination already used by another file"
                );
                return BatchItem {
                    result: BatchResult::Rejected(format!(
                        "destination {} is already used by another file",
                        destination.display()
                    )),
                    source,
                    destination,
                };
            }

            debug!(source = %source.display(), "Queued conversion");

            let converted = match timeout {
                Some(limit) => tokio::time::timeout(limit, converter.convert(request))
                    .await
                    .ok(),
                None => Some(converter.convert(request).await),
            };

            let result = match converted {
                None => {
                    warn!(source = %source.display(), "Conversion timed out");
                    BatchResult::TimedOut
                }
                Some(Ok(ConversionOutcome::Succeeded)) => BatchResult::Converted,
                Some(Ok(ConversionOutcome::Failed(failure))) => {
                    BatchResult::Failed(failure.to_string())
                }
                Some(Err(e)) => BatchResult::Rejected(e.to_string()),
            };

            BatchItem {
                source,
                destination,
                result,
            }
        })
        .buffered(max_parallel.max(1))
        .collect::<Vec<_>>()
        .await;

    BatchSummary { items }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonearm_core::testing::{fixtures, MockConverter};
    use tonearm_core::ConverterError;

    #[test]
    fn test_plan_requests() {
        let inputs = vec![
            PathBuf::from("/downloads/One.webm"),
            PathBuf::from("/downloads/two.opus"),
        ];
        let requests = plan_requests(&inputs, Path::new("/music"), Some(AudioFormat::Opus), None);

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].destination, PathBuf::from("/music/One.opus"));
        assert_eq!(requests[1].destination, PathBuf::from("/music/two.opus"));
        assert_eq!(requests[1].format, Some(AudioFormat::Opus));
        assert!(requests[0].tool.is_none());
    }

    #[test]
    fn test_plan_requests_default_format() {
        let inputs = vec![PathBuf::from("song.webm")];
        let tool = Path::new("/opt/ffmpeg");
        let requests = plan_requests(&inputs, Path::new("out"), None, Some(tool));

        assert_eq!(requests[0].destination, PathBuf::from("out/song.mp3"));
        assert!(requests[0].format.is_none());
        assert_eq!(requests[0].tool, Some(PathBuf::from("/opt/ffmpeg")));
    }

    #[tokio::test]
    async fn test_batch_all_succeed() {
        let converter = MockConverter::new();
        let requests = fixtures::requests("/downloads", "/music", &["a", "b", "c"]);

        let summary = run_batch(&converter, requests, 2, None).await;

        assert_eq!(summary.succeeded(), 3);
        assert!(summary.all_succeeded());
        assert_eq!(converter.conversion_count().await, 3);
        assert_eq!(summary.items[2].source, PathBuf::from("/downloads/c.webm"));
    }

    #[tokio::test]
    async fn test_batch_reports_failures_in_order() {
        let converter = MockConverter::new();
        converter
            .fail_source("/downloads/b.webm", 17, "Invalid data found")
            .await;
        let requests = fixtures::requests("/downloads", "/music", &["a", "b", "c"]);

        let summary = run_batch(&converter, requests, 3, None).await;

        assert_eq!(summary.succeeded(), 2);
        let failed: Vec<_> = summary.failed().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].source, PathBuf::from("/downloads/b.webm"));
        match &failed[0].result {
            BatchResult::Failed(message) => {
                assert!(message.contains("ffmpeg returned an error (17)"));
                assert!(message.contains("Invalid data found"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_batch_rejected_request() {
        let converter = MockConverter::new();
        converter
            .set_next_error(ConverterError::unsupported_format("aiff"))
            .await;
        let requests = fixtures::requests("/downloads", "/music", &["a"]);

        let summary = run_batch(&converter, requests, 1, None).await;

        assert!(matches!(summary.items[0].result, BatchResult::Rejected(_)));
        assert!(!summary.all_succeeded());
    }

    #[tokio::test]
    async fn test_batch_rejects_shared_destination() {
        let converter = MockConverter::new();
        let inputs = vec![
            PathBuf::from("/downloads/a/song.webm"),
            PathBuf::from("/downloads/b/song.m4a"),
            PathBuf::from("/downloads/other.webm"),
        ];
        let requests = plan_requests(&inputs, Path::new("/music"), None, None);
        assert_eq!(requests[0].destination, requests[1].destination);

        let summary = run_batch(&converter, requests, 4, None).await;

        assert_eq!(summary.items[0].result, BatchResult::Converted);
        match &summary.items[1].result {
            BatchResult::Rejected(reason) => assert!(reason.contains("/music/song.mp3")),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(summary.items[2].result, BatchResult::Converted);

        let recorded = converter.recorded_conversions().await;
        assert_eq!(recorded.len(), 2);
        assert!(recorded
            .iter()
            .all(|c| c.request.source != Path::new("/downloads/b/song.m4a")));
    }

    #[tokio::test]
    async fn test_batch_timeout() {
        let converter = MockConverter::new();
        converter
            .set_conversion_duration(Duration::from_millis(500))
            .await;
        let requests = fixtures::requests("/downloads", "/music", &["slow"]);

        let summary = run_batch(&converter, requests, 1, Some(Duration::from_millis(20))).await;

        assert_eq!(summary.items[0].result, BatchResult::TimedOut);
        // The conversion was dropped before it could be recorded.
        assert_eq!(converter.conversion_count().await, 0);
    }

    #[tokio::test]
    async fn test_batch_with_trait_object() {
        let converter: Box<dyn Converter> = Box::new(MockConverter::new());
        let requests = fixtures::requests("/downloads", "/music", &["a", "b"]);

        let summary = run_batch(converter.as_ref(), requests, 4, None).await;
        assert_eq!(summary.succeeded(), 2);
    }
}
