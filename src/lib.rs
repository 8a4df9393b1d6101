//! Refcheck: a concurrent document link checker
//!
//! This crate verifies a set of hyperlink references extracted from a
//! document corpus: reachability, in-page anchor presence, redirects,
//! per-target authentication and request headers, ignore rules, and two
//! stable report encodings.

pub mod checker;
pub mod config;
pub mod input;
pub mod output;
pub mod policy;

use thiserror::Error;

/// Main error type for refcheck operations
#[derive(Debug, Error)]
pub enum RefcheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Links file error: {0}")]
    Input(#[from] InputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Failed to write report {path}: {source}")]
    Report {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to encode report record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Errors reading the upstream extractor's links file
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read links file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed link record on line {lineno}: {source}")]
    Record {
        lineno: usize,
        source: serde_json::Error,
    },
}

/// Result type alias for refcheck operations
pub type Result<T> = std::result::Result<T, RefcheckError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use checker::{check_links, CheckResult, CheckStatus, LinkReference};
pub use config::Config;
pub use policy::Policy;
