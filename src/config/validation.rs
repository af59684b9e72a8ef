use crate::config::WatchConfig;
use crate::url::ensure_scheme;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &WatchConfig) -> Result<(), ConfigError> {
    validate_target_url(&config.url)?;
    validate_timings(config)?;
    validate_ignore_list(&config.ignore)?;
    Ok(())
}

/// Validates the target URL
fn validate_target_url(url: &str) -> Result<(), ConfigError> {
    if url.trim().is_empty() {
        return Err(ConfigError::Validation(
            "target URL cannot be empty".to_string(),
        ));
    }

    let normalized = ensure_scheme(url);
    let parsed = Url::parse(&normalized)
        .map_err(|error| ConfigError::InvalidUrl(format!("'{}': {}", url, error)))?;

    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "'{}' has no host",
            url
        )));
    }

    Ok(())
}

/// Validates delay and timeout settings
fn validate_timings(config: &WatchConfig) -> Result<(), ConfigError> {
    // delay_secs >= 0 is always true for u64, so no check needed

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout must be at least 1 second, got 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates ignore-list entries
fn validate_ignore_list(ignore: &[String]) -> Result<(), ConfigError> {
    for entry in ignore {
        if entry.trim().is_empty() {
            return Err(ConfigError::Validation(
                "ignore entries cannot be blank".to_string(),
            ));
        }
    }
    Ok(())
}
