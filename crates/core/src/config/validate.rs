use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - series name is non-empty and season is at least 1
/// - extraction timing values are non-zero
/// - tool paths are non-empty
/// - discovery retry policy asks for at least one attempt
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.series.name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "series.name cannot be empty".to_string(),
        ));
    }

    if config.series.season == 0 {
        return Err(ConfigError::ValidationError(
            "series.season must be at least 1".to_string(),
        ));
    }

    if config.extraction.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "extraction.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.extraction.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "extraction.poll_interval_ms cannot be 0".to_string(),
        ));
    }

    if config.fetcher.downloader_path.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "fetcher.downloader_path cannot be empty".to_string(),
        ));
    }

    if config.decryptor.ffmpeg_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "decryptor.ffmpeg_path cannot be empty".to_string(),
        ));
    }

    if config.orchestrator.discovery_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "orchestrator.discovery_attempts must be at least 1".to_string(),
        ));
    }

    Ok(())
}
