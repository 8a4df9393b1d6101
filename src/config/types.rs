use serde::Deserialize;
use std::collections::HashMap;

/// Main configuration structure for refcheck
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub checker: CheckerConfig,

    #[serde(default)]
    pub output: OutputConfig,

    /// Regex patterns; a URI matching any of them is never probed
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Regex patterns; a fragment matching any of them is exempt from
    /// anchor validation
    #[serde(rename = "anchor-ignore", default = "default_anchor_ignore")]
    pub anchor_ignore: Vec<String>,

    /// Ordered auth rules; the first pattern matching a URI wins
    #[serde(default)]
    pub auth: Vec<AuthEntry>,

    /// Request headers keyed by URI prefix, with "*" applying everywhere
    #[serde(default)]
    pub headers: HashMap<String, HashMap<String, String>>,
}

/// Checker behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CheckerConfig {
    /// Number of concurrent check workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Retry budget for transient transport failures
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Maximum redirect hops before a chain is classified broken
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: u32,

    /// Whether fragments are validated against page content
    #[serde(rename = "check-anchors", default = "default_check_anchors")]
    pub check_anchors: bool,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Report output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the plain-text report
    #[serde(rename = "text-path", default = "default_text_path")]
    pub text_path: String,

    /// Path of the JSON-lines report
    #[serde(rename = "json-path", default = "default_json_path")]
    pub json_path: String,
}

/// One ordered auth rule: a URI pattern and the HTTP Basic credential it
/// supplies
#[derive(Debug, Clone, Deserialize)]
pub struct AuthEntry {
    pub pattern: String,
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
}

fn default_workers() -> usize {
    5
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    1
}

fn default_max_redirects() -> u32 {
    10
}

fn default_check_anchors() -> bool {
    true
}

fn default_user_agent() -> String {
    format!("refcheck/{}", env!("CARGO_PKG_VERSION"))
}

fn default_text_path() -> String {
    "output.txt".to_string()
}

fn default_json_path() -> String {
    "output.json".to_string()
}

/// Fragments starting with "!" are router state, not document anchors
fn default_anchor_ignore() -> Vec<String> {
    vec!["^!".to_string()]
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            timeout: default_timeout(),
            retries: default_retries(),
            max_redirects: default_max_redirects(),
            check_anchors: default_check_anchors(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            text_path: default_text_path(),
            json_path: default_json_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            checker: CheckerConfig::default(),
            output: OutputConfig::default(),
            ignore: Vec::new(),
            anchor_ignore: default_anchor_ignore(),
            auth: Vec::new(),
            headers: HashMap::new(),
        }
    }
}
