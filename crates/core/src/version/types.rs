//! Types for the version module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest FFmpeg release known to work.
pub const MIN_SUPPORTED_VERSION: f64 = 4.2;

/// How a compatibility determination was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionEvidence {
    /// A `major.minor` version was read from the banner.
    ParsedVersion,
    /// No version in the banner, but a recent copyright range was found.
    CopyrightDateFallback,
    /// Neither heuristic matched.
    Undetermined,
    /// The tool could not be spawned.
    NotFound,
    /// The caller opted out of checking.
    Skipped,
}

impl VersionEvidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParsedVersion => "parsed-version",
            Self::CopyrightDateFallback => "copyright-date-fallback",
            Self::Undetermined => "undetermined",
            Self::NotFound => "not-found",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for VersionEvidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a version check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VersionCompatibility {
    /// Whether the tool is considered usable.
    pub compatible: bool,
    /// Heuristic that produced the determination.
    pub evidence: VersionEvidence,
    /// Version read from the banner, when one was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_version: Option<f64>,
}

impl VersionCompatibility {
    pub fn parsed(version: f64) -> Self {
        Self {
            compatible: version >= MIN_SUPPORTED_VERSION,
            evidence: VersionEvidence::ParsedVersion,
            detected_version: Some(version),
        }
    }

    pub fn copyright_fallback() -> Self {
        Self {
            compatible: true,
            evidence: VersionEvidence::CopyrightDateFallback,
            detected_version: None,
        }
    }

    pub fn undetermined() -> Self {
        Self {
            compatible: false,
            evidence: VersionEvidence::Undetermined,
            detected_version: None,
        }
    }

    pub fn not_found() -> Self {
        Self {
            compatible: false,
            evidence: VersionEvidence::NotFound,
            detected_version: None,
        }
    }

    pub fn skipped() -> Self {
        Self {
            compatible: true,
            evidence: VersionEvidence::Skipped,
            detected_version: None,
        }
    }

    /// Human-readable text for a negative determination.
    ///
    /// Returns `None` when the tool is compatible.
    pub fn warning(&self) -> Option<String> {
        if self.compatible {
            return None;
        }

        match (self.evidence, self.detected_version) {
            (VersionEvidence::NotFound, _) => Some("FFmpeg was not found".to_string()),
            (VersionEvidence::ParsedVersion, Some(version)) => Some(format!(
                "Your FFmpeg installation is too old ({version:?}), please update to {MIN_SUPPORTED_VERSION}+"
            )),
            _ => Some("Your FFmpeg version couldn't be detected".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_threshold() {
        assert!(VersionCompatibility::parsed(4.2).compatible);
        assert!(VersionCompatibility::parsed(6.1).compatible);
        assert!(!VersionCompatibility::parsed(4.1).compatible);
        assert!(!VersionCompatibility::parsed(3.4).compatible);
    }

    #[test]
    fn test_warning_text() {
        assert!(VersionCompatibility::parsed(5.0).warning().is_none());
        assert!(VersionCompatibility::skipped().warning().is_none());
        assert_eq!(
            VersionCompatibility::parsed(4.1).warning().unwrap(),
            "Your FFmpeg installation is too old (4.1), please update to 4.2+"
        );
        assert_eq!(
            VersionCompatibility::parsed(4.0).warning().unwrap(),
            "Your FFmpeg installation is too old (4.0), please update to 4.2+"
        );
        assert_eq!(
            VersionCompatibility::not_found().warning().unwrap(),
            "FFmpeg was not found"
        );
        assert_eq!(
            VersionCompatibility::undetermined().warning().unwrap(),
            "Your FFmpeg version couldn't be detected"
        );
    }

    #[test]
    fn test_evidence_serialization() {
        let json = serde_json::to_string(&VersionCompatibility::copyright_fallback()).unwrap();
        assert_eq!(
            json,
            r#"{"compatible":true,"evidence":"copyright-date-fallback"}"#
        );
        assert_eq!(VersionEvidence::NotFound.to_string(), "not-found");
    }
}
