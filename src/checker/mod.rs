//! Link checking: types, prober, anchor resolver, and scheduler
//!
//! This module contains the core checking logic, including:
//! - The per-link probe state machine with HEAD→GET fallback
//! - Anchor resolution against fetched page content
//! - The bounded worker pool that drains the link queue

pub mod anchors;
mod prober;
mod scheduler;
mod types;

pub use prober::{build_http_client, ProbeOutcome, Prober};
pub use scheduler::Scheduler;
pub use types::{CheckResult, CheckStatus, LinkReference};

use crate::config::Config;
use crate::policy::Policy;
use crate::Result;
use std::sync::Arc;

/// Checks a set of link references against the configured policy
///
/// This is the main library entry point. It compiles the policy once,
/// builds the shared HTTP client, and runs the worker pool to completion.
/// Exactly one result is returned per input reference, in completion
/// order.
///
/// # Arguments
///
/// * `config` - The checker configuration
/// * `links` - Link references from the upstream extractor
///
/// # Returns
///
/// * `Ok(Vec<CheckResult>)` - One result per reference
/// * `Err(RefcheckError)` - Setup failed (policy compile or client build)
pub async fn check_links(config: &Config, links: Vec<LinkReference>) -> Result<Vec<CheckResult>> {
    let policy = Arc::new(Policy::from_config(config)?);
    let scheduler = Scheduler::new(config, policy)?;
    Ok(scheduler.run(links).await)
}
