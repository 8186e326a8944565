//! Converter module for transcoding downloaded audio with FFmpeg.
//!
//! This module provides the `Converter` trait and the `FfmpegDriver`
//! implementation. The driver does no audio work itself: it picks codec and
//! quality arguments for the requested format, launches ffmpeg and reports
//! the exit status together with everything the tool printed.
//!
//! # Formats
//!
//! | format | codec | quality |
//! |--------|-------|---------|
//! | mp3 (default) | libmp3lame | `-q:a 0` |
//! | flac | flac | `-q:a 0` |
//! | ogg | libvorbis | `-q:a 5` |
//! | opus | libopus, or stream copy for `.opus` sources | `-q:a 0` |
//! | m4a | aac, video dropped | none |
//! | wav | container default | `-q:a 0` |
//!
//! # Example
//!
//! ```ignore
//! use tonearm_core::converter::{
//!     AudioFormat, ConversionOutcome, ConversionRequest, Converter, FfmpegDriver,
//! };
//!
//! let driver = FfmpegDriver::with_defaults();
//! driver.validate().await?;
//!
//! let request = ConversionRequest::new("downloads/song.webm", "music/song.ogg")
//!     .with_format(AudioFormat::Ogg);
//!
//! match driver.convert(request).await? {
//!     ConversionOutcome::Succeeded => println!("done"),
//!     ConversionOutcome::Failed(failure) => eprintln!("{failure}"),
//! }
//! ```

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use config::{ConverterConfig, DEFAULT_FFMPEG};
pub use error::ConverterError;
pub use ffmpeg::FfmpegDriver;
pub use traits::Converter;
pub use types::{
    AudioFormat, ConversionFailure, ConversionOutcome, ConversionRequest, FormatProfile,
};
