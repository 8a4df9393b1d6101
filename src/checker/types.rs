//! Core data types shared by the scheduler, prober, and report emitters

use serde::{Deserialize, Serialize};

/// One hyperlink occurrence delivered by the upstream document extractor
///
/// Duplicate URIs across documents are not deduplicated; every occurrence
/// is checked and reported independently.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkReference {
    /// Source document the link appears in
    pub filename: String,

    /// Line number of the occurrence within the source document
    pub lineno: u64,

    /// The link target as written, fragment included
    pub uri: String,
}

/// Terminal classification of one checked link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// Target reachable; anchor present if one was required
    Working,

    /// HTTP failure, exhausted transport failure, or missing anchor
    Broken,

    /// URI matched an ignore rule; no request was made
    Ignored,

    /// Target answered with a redirect before succeeding
    Redirected,

    /// Request deadline exceeded after the retry budget ran out
    Timeout,

    /// URI could not be parsed; never probed, never retried
    Unknown,
}

impl CheckStatus {
    /// Lowercase label used in both report encodings
    pub fn label(&self) -> &'static str {
        match self {
            CheckStatus::Working => "working",
            CheckStatus::Broken => "broken",
            CheckStatus::Ignored => "ignored",
            CheckStatus::Redirected => "redirected",
            CheckStatus::Timeout => "timeout",
            CheckStatus::Unknown => "unknown",
        }
    }

    /// Whether this status makes the overall run non-clean
    pub fn is_failure(&self) -> bool {
        matches!(self, CheckStatus::Broken | CheckStatus::Timeout)
    }
}

/// Outcome of checking one [`LinkReference`]
///
/// Exactly one result exists per input reference. For redirected results
/// `code` holds the first hop's HTTP status so the text report can render
/// its reason phrase; the structured report exposes 0 instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub filename: String,
    pub lineno: u64,
    pub uri: String,
    pub status: CheckStatus,

    /// HTTP status code when applicable, else 0
    pub code: u16,

    /// Error text, redirect target, or anchor failure message; empty for
    /// a clean working result
    pub info: String,
}

impl CheckResult {
    /// Builds a result for a reference from the prober's classification
    pub fn new(reference: &LinkReference, status: CheckStatus, code: u16, info: String) -> Self {
        Self {
            filename: reference.filename.clone(),
            lineno: reference.lineno,
            uri: reference.uri.clone(),
            status,
            code,
            info,
        }
    }
}
