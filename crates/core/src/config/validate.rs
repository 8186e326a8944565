use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - ffmpeg path is not empty
/// - batch.max_parallel is at least 1
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.converter.ffmpeg_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "converter.ffmpeg_path cannot be empty".to_string(),
        ));
    }

    if config.batch.max_parallel == 0 {
        return Err(ConfigError::ValidationError(
            "batch.max_parallel cannot be 0".to_string(),
        ));
    }

    Ok(())
}
