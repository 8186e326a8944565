//! Version check integration tests against fake ffmpeg banners.

#![cfg(unix)]

mod common;

use std::path::Path;

use tonearm_core::{
    testing::fixtures, Converter, ConverterConfig, ConverterError, FfmpegDriver, VersionChecker,
    VersionEvidence,
};

use common::tools;

fn check(tool: &str) -> tonearm_core::VersionCompatibility {
    VersionChecker::new(Some(tools().path(tool).as_path()), false).check()
}

#[test]
fn test_release_banner_is_parsed() {
    let result = check("ffmpeg-4.3");
    assert!(result.compatible);
    assert_eq!(result.evidence, VersionEvidence::ParsedVersion);
    assert_eq!(result.detected_version, Some(4.3));
}

#[test]
fn test_old_banner_is_rejected() {
    let result = check("ffmpeg-3.4");
    assert!(!result.compatible);
    assert_eq!(result.evidence, VersionEvidence::ParsedVersion);
    assert!(result.warning().unwrap().contains("(3.4)"));
}

#[test]
fn test_snapshot_banner_uses_copyright() {
    let result = check("ffmpeg-snapshot");
    assert!(result.compatible);
    assert_eq!(result.evidence, VersionEvidence::CopyrightDateFallback);
}

#[test]
fn test_banner_on_stderr_is_read() {
    // Exit status of the version query is ignored.
    let result = check("ffmpeg-stderr-banner");
    assert!(result.compatible);
    assert_eq!(result.detected_version, Some(5.1));
}

#[test]
fn test_unknown_tool_is_undetermined() {
    let result = check("not-ffmpeg");
    assert!(!result.compatible);
    assert_eq!(result.evidence, VersionEvidence::Undetermined);
}

#[test]
fn test_missing_tool_is_not_found() {
    let _ = tools();
    let result = VersionChecker::new(Some(Path::new("/nonexistent/bin/ffmpeg")), false).check();
    assert!(!result.compatible);
    assert_eq!(result.evidence, VersionEvidence::NotFound);
}

#[test]
fn test_skip_ignores_tool_output() {
    let result = VersionChecker::new(Some(tools().path("not-ffmpeg").as_path()), true).check();
    assert!(result.compatible);
    assert_eq!(result.evidence, VersionEvidence::Skipped);
}

#[test]
fn test_fixture_banners() {
    use tonearm_core::parse_version_output;

    assert_eq!(
        parse_version_output(fixtures::RELEASE_BANNER).detected_version,
        Some(4.4)
    );
    assert_eq!(
        parse_version_output(fixtures::SNAPSHOT_BANNER).evidence,
        VersionEvidence::CopyrightDateFallback
    );
    assert!(!parse_version_output(fixtures::OLD_BANNER).compatible);
}

#[tokio::test]
async fn test_driver_validate() {
    let driver = FfmpegDriver::new(ConverterConfig::with_path(tools().path("ffmpeg-4.3")));
    let result = driver.validate().await.unwrap();
    assert_eq!(result.detected_version, Some(4.3));

    let driver = FfmpegDriver::new(ConverterConfig::with_path(tools().path("ffmpeg-3.4")));
    let err = driver.validate().await.unwrap_err();
    assert!(matches!(err, ConverterError::IncompatibleVersion { .. }));

    let driver = FfmpegDriver::new(ConverterConfig::with_path(tools().path("not-ffmpeg")));
    let err = driver.validate().await.unwrap_err();
    assert!(err.to_string().contains("couldn't be detected"));

    let driver = FfmpegDriver::new(
        ConverterConfig::with_path(tools().path("not-ffmpeg")).with_skip_version_check(true),
    );
    assert!(driver.validate().await.unwrap().compatible);
}
