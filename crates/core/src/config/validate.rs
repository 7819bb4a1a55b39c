use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - API URL is an http(s) URL
/// - Timeouts are not 0
/// - Concurrency limits are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let url = config.api.url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "api.url must be an http(s) URL, got {:?}",
            config.api.url
        )));
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "api.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.probe.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "probe.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.fetch.concurrency == 0 || config.probe.concurrency == 0 {
        return Err(ConfigError::ValidationError(
            "concurrency cannot be 0".to_string(),
        ));
    }

    if config.fetch.max_results == 0 {
        return Err(ConfigError::ValidationError(
            "fetch.max_results cannot be 0".to_string(),
        ));
    }

    Ok(())
}
