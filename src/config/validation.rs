use crate::config::types::{AuthEntry, CheckerConfig, Config, OutputConfig};
use crate::ConfigError;
use regex::Regex;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_checker_config(&config.checker)?;
    validate_output_config(&config.output)?;
    validate_patterns(&config.ignore)?;
    validate_patterns(&config.anchor_ignore)?;
    validate_auth_entries(&config.auth)?;
    Ok(())
}

/// Validates checker configuration
fn validate_checker_config(config: &CheckerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            config.workers
        )));
    }

    if config.timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout must be >= 1 second, got {}",
            config.timeout
        )));
    }

    if config.max_redirects < 1 {
        return Err(ConfigError::Validation(format!(
            "max-redirects must be >= 1, got {}",
            config.max_redirects
        )));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.text_path.is_empty() {
        return Err(ConfigError::Validation(
            "text-path cannot be empty".to_string(),
        ));
    }

    if config.json_path.is_empty() {
        return Err(ConfigError::Validation(
            "json-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Checks that every pattern in a list compiles as a regex
fn validate_patterns(patterns: &[String]) -> Result<(), ConfigError> {
    for pattern in patterns {
        compile_check(pattern)?;
    }
    Ok(())
}

/// Validates auth rule entries
fn validate_auth_entries(entries: &[AuthEntry]) -> Result<(), ConfigError> {
    for entry in entries {
        compile_check(&entry.pattern)?;

        if entry.username.is_empty() {
            return Err(ConfigError::Validation(format!(
                "auth rule '{}' has an empty username",
                entry.pattern
            )));
        }
    }
    Ok(())
}

fn compile_check(pattern: &str) -> Result<(), ConfigError> {
    Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}
