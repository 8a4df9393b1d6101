//! Configuration module for refcheck
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files.
//!
//! # Example
//!
//! ```no_run
//! use refcheck::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("refcheck.toml")).unwrap();
//! println!("Checking with {} workers", config.checker.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{AuthEntry, CheckerConfig, Config, OutputConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
