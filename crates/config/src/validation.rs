//! Configuration validation

use crate::{AppConfig, ConfigError, Result};

/// Validation error details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate the entire application configuration
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let mut errors = Vec::new();

    if config.tracker.historical_cutoff_secs == 0 {
        errors.push(ValidationError::new(
            "tracker.historical_cutoff_secs",
            "must be greater than 0",
        ));
    }

    if let Err(e) = validate_url(&config.steam.base_url) {
        errors.push(ValidationError::new("steam.base_url", e));
    }

    if let Some(key) = &config.steam.api_key {
        if key.trim().is_empty() {
            errors.push(ValidationError::new(
                "steam.api_key",
                "must not be blank when set",
            ));
        }
    }

    if config.steam.timeout_ms == 0 {
        errors.push(ValidationError::new(
            "steam.timeout_ms",
            "must be greater than 0",
        ));
    }

    if config.steam.max_pages == 0 {
        errors.push(ValidationError::new(
            "steam.max_pages",
            "must be greater than 0",
        ));
    }

    if config.steam.max_backoff_ms < config.steam.initial_backoff_ms {
        errors.push(ValidationError::new(
            "steam.max_backoff_ms",
            "must not be below steam.initial_backoff_ms",
        ));
    }

    if let Err(e) = validate_log_level(&config.logging.level) {
        errors.push(e);
    }

    if config.logging.metrics_enabled && config.logging.metrics_port == 0 {
        errors.push(ValidationError::new(
            "logging.metrics_port",
            "metrics port must be greater than 0",
        ));
    }

    if !errors.is_empty() {
        let error_msg = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ConfigError::ValidationError(error_msg));
    }

    Ok(())
}

/// Validate an HTTP(S) endpoint URL
pub fn validate_url(url: &str) -> std::result::Result<(), String> {
    if url.is_empty() {
        return Err("URL cannot be empty".to_string());
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err("URL must start with http:// or https://".to_string());
    }

    Ok(())
}

fn validate_log_level(level: &str) -> std::result::Result<(), ValidationError> {
    match level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::new(
            "logging.level",
            format!(
                "invalid log level '{level}', must be one of: trace, debug, info, warn, error"
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_problem() {
        let mut config = AppConfig::default();
        config.tracker.historical_cutoff_secs = 0;
        config.steam.base_url = "ftp://steam".to_string();
        config.logging.level = "loud".to_string();

        let err = validate_config(&config).unwrap_err();
        let ConfigError::ValidationError(msg) = err else {
            panic!("expected validation error");
        };
        assert!(msg.contains("tracker.historical_cutoff_secs"));
        assert!(msg.contains("steam.base_url"));
        assert!(msg.contains("logging.level"));
        assert_eq!(msg.matches("; ").count(), 2);
    }

    #[test]
    fn test_blank_api_key_is_invalid() {
        let mut config = AppConfig::default();
        config.steam.api_key = Some(String::new());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_backoff_ceiling_below_initial_delay() {
        let mut config = AppConfig::default();
        config.steam.initial_backoff_ms = 1_000;
        config.steam.max_backoff_ms = 100;

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("steam.max_backoff_ms"));
    }

    #[test]
    fn test_metrics_port_only_checked_when_enabled() {
        let mut config = AppConfig::default();
        config.logging.metrics_port = 0;
        assert!(validate_config(&config).is_err());

        config.logging.metrics_enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://api.steampowered.com").is_ok());
        assert!(validate_url("http://127.0.0.1:8080").is_ok());
        assert!(validate_url("").is_err());
        assert!(validate_url("api.steampowered.com").is_err());
    }
}
