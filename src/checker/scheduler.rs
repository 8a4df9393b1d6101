//! Check scheduler: a bounded worker pool draining the link queue
//!
//! Every link reference becomes one tokio task gated by a semaphore sized
//! to the configured worker count. The run is a synchronization barrier:
//! it returns only after every job has produced a result, and one job's
//! failure never cancels its siblings.

use crate::checker::prober::{build_http_client, Prober};
use crate::checker::types::{CheckResult, CheckStatus, LinkReference};
use crate::config::Config;
use crate::policy::Policy;
use crate::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Dispatches link-check jobs to the prober with bounded concurrency
pub struct Scheduler {
    prober: Arc<Prober>,
    workers: usize,
}

impl Scheduler {
    /// Creates a scheduler with a shared HTTP client and frozen policy
    pub fn new(config: &Config, policy: Arc<Policy>) -> Result<Self> {
        let client = build_http_client(&config.checker)?;
        let prober = Arc::new(Prober::new(client, config.checker.clone(), policy));

        Ok(Self {
            prober,
            workers: config.checker.workers,
        })
    }

    /// Checks every reference and collects one result per reference
    ///
    /// Results arrive in completion order, which is not stable across
    /// runs; callers must key by `uri` or `(filename, lineno)`.
    pub async fn run(&self, links: Vec<LinkReference>) -> Vec<CheckResult> {
        let total = links.len();
        tracing::info!("Checking {} links with {} workers", total, self.workers);

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut join_set = JoinSet::new();
        let mut in_flight = HashMap::with_capacity(total);

        for reference in links {
            let prober = Arc::clone(&self.prober);
            let semaphore = Arc::clone(&semaphore);
            let job_reference = reference.clone();

            let handle = join_set.spawn(async move {
                // The semaphore is never closed while jobs run, so an
                // acquire error cannot happen; proceed unguarded if it does
                let _permit = semaphore.acquire_owned().await.ok();
                let outcome = prober.probe(&job_reference.uri).await;
                outcome.into_result(&job_reference)
            });

            in_flight.insert(handle.id(), reference);
        }

        let mut results = Vec::with_capacity(total);
        while let Some(joined) = join_set.join_next_with_id().await {
            match joined {
                Ok((id, result)) => {
                    in_flight.remove(&id);
                    tracing::debug!(
                        "{} -> {} ({}/{})",
                        result.uri,
                        result.status.label(),
                        results.len() + 1,
                        total
                    );
                    results.push(result);
                }
                Err(e) => {
                    // A panicked job still owes its reference a result
                    tracing::error!("Check worker failed: {}", e);
                    if let Some(reference) = in_flight.remove(&e.id()) {
                        results.push(CheckResult::new(
                            &reference,
                            CheckStatus::Broken,
                            0,
                            format!("check worker failed: {}", e),
                        ));
                    }
                }
            }
        }

        results
    }
}
