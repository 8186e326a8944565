//! FFmpeg version compatibility checking.
//!
//! The check runs `ffmpeg -version` and reads the banner. When no version
//! number can be found, a copyright range ending in 202x is accepted as proof
//! of a recent build.
//!
//! # Example
//!
//! ```ignore
//! use tonearm_core::version::VersionChecker;
//!
//! let result = VersionChecker::new(None, false).check();
//! if let Some(warning) = result.warning() {
//!     eprintln!("{warning}");
//! }
//! ```

mod checker;
mod types;

pub use checker::{parse_version_output, VersionChecker};
pub use types::{VersionCompatibility, VersionEvidence, MIN_SUPPORTED_VERSION};
