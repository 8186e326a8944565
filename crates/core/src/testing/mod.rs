//! Testing utilities and mock implementations.
//!
//! Hosts that drive many conversions through the [`Converter`] trait can be
//! tested against [`MockConverter`] without ffmpeg installed.
//!
//! [`Converter`]: crate::converter::Converter
//!
//! # Example
//!
//! ```rust,ignore
//! use tonearm_core::testing::{fixtures, MockConverter};
//!
//! let converter = MockConverter::new();
//! let requests = fixtures::requests("/downloads", "/music", &["a", "b"]);
//! ```

mod mock_converter;

pub use mock_converter::{MockConverter, RecordedConversion};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::Path;

    use crate::converter::ConversionRequest;

    /// Banner printed by a release build of ffmpeg 4.4.
    pub const RELEASE_BANNER: &str =
        "ffmpeg version 4.4.2 Copyright (c) 2000-2021 the FFmpeg developers\nbuilt with gcc 11.2.0 (GCC)\n";

    /// Banner printed by a git snapshot build.
    pub const SNAPSHOT_BANNER: &str =
        "ffmpeg version N-104465-g08a501946f Copyright (c) 2015-2021 the FFmpeg developers\n";

    /// Banner printed by a build too old to use.
    pub const OLD_BANNER: &str =
        "ffmpeg version 3.4.8-0ubuntu0.2 Copyright (c) 2000-2020 the FFmpeg developers\n";

    /// Create one request per name, `<source_dir>/<name>.webm` to `<dest_dir>/<name>.mp3`.
    pub fn requests(
        source_dir: impl AsRef<Path>,
        dest_dir: impl AsRef<Path>,
        names: &[&str],
    ) -> Vec<ConversionRequest> {
        names
            .iter()
            .map(|name| {
                ConversionRequest::new(
                    source_dir.as_ref().join(format!("{name}.webm")),
                    dest_dir.as_ref().join(format!("{name}.mp3")),
                )
            })
            .collect()
    }
}
