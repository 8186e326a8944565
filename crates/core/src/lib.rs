//! FFmpeg version checking and audio transcoding.
//!
//! - [`version`]: decides whether an installed ffmpeg is usable.
//! - [`converter`]: builds per-format ffmpeg arguments and runs conversions.
//! - [`config`]: TOML and environment configuration for hosts.

pub mod config;
pub mod converter;
pub mod testing;
pub mod version;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, BatchConfig,
    Config, ConfigError,
};
pub use converter::{
    AudioFormat, ConversionFailure, ConversionOutcome, ConversionRequest, Converter,
    ConverterConfig, ConverterError, FfmpegDriver, FormatProfile,
};
pub use version::{
    parse_version_output, VersionChecker, VersionCompatibility, VersionEvidence,
    MIN_SUPPORTED_VERSION,
};
