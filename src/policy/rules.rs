//! Compiled check policy: ignore rules, anchor exemptions, auth rules,
//! and per-target request headers
//!
//! The policy is compiled once from the configuration and stays read-only
//! for the whole run; the scheduler hands it to every worker behind an
//! `Arc`.

use crate::config::Config;
use crate::ConfigError;
use regex::Regex;
use std::collections::HashMap;

/// Baseline Accept header attached to every request unless a rule
/// overrides it
pub const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8";

/// HTTP Basic credential resolved for a URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: Option<String>,
}

/// Immutable rule set resolved per URI during checking
#[derive(Debug)]
pub struct Policy {
    /// A URI matching any of these is never probed
    ignore: Vec<Regex>,

    /// A fragment matching any of these skips anchor validation
    anchor_ignore: Vec<Regex>,

    /// Ordered as declared; resolution is first-match-wins
    auth: Vec<(Regex, Credential)>,

    /// Headers under the "*" key, applied to every URI
    wildcard_headers: HashMap<String, String>,

    /// Prefix-keyed headers, sorted longest prefix first
    prefix_headers: Vec<(String, HashMap<String, String>)>,
}

impl Policy {
    /// Compiles the configured rule set
    ///
    /// # Arguments
    ///
    /// * `config` - The loaded configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Policy)` - All patterns compiled
    /// * `Err(ConfigError)` - A pattern failed to compile
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let ignore = compile_patterns(&config.ignore)?;
        let anchor_ignore = compile_patterns(&config.anchor_ignore)?;

        let mut auth = Vec::with_capacity(config.auth.len());
        for entry in &config.auth {
            let regex = compile(&entry.pattern)?;
            auth.push((
                regex,
                Credential {
                    username: entry.username.clone(),
                    password: entry.password.clone(),
                },
            ));
        }

        let mut wildcard_headers = HashMap::new();
        let mut prefix_headers = Vec::new();
        for (key, headers) in &config.headers {
            if key == "*" {
                wildcard_headers = headers.clone();
            } else {
                prefix_headers.push((key.clone(), headers.clone()));
            }
        }
        // Longest prefix first; lexical order keeps ties deterministic
        prefix_headers.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Ok(Self {
            ignore,
            anchor_ignore,
            auth,
            wildcard_headers,
            prefix_headers,
        })
    }

    /// Whether a URI is excluded from checking entirely
    ///
    /// Patterns are unanchored: a match anywhere in the URI counts.
    pub fn is_ignored(&self, uri: &str) -> bool {
        self.ignore.iter().any(|re| re.is_match(uri))
    }

    /// Whether a fragment is exempt from anchor validation
    pub fn anchor_exempt(&self, fragment: &str) -> bool {
        self.anchor_ignore.iter().any(|re| re.is_match(fragment))
    }

    /// Resolves the credential for a URI
    ///
    /// Rules are scanned in declared order and the first match wins, so
    /// more specific rules must be declared before broader ones.
    pub fn auth_for(&self, uri: &str) -> Option<&Credential> {
        self.auth
            .iter()
            .find(|(re, _)| re.is_match(uri))
            .map(|(_, credential)| credential)
    }

    /// Resolves the request headers for a URI
    ///
    /// Resolution order: baseline Accept, then wildcard headers, then the
    /// single longest matching prefix entry. Later layers override
    /// same-named keys and accumulate otherwise.
    pub fn headers_for(&self, uri: &str) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert("Accept".to_string(), DEFAULT_ACCEPT.to_string());

        for (name, value) in &self.wildcard_headers {
            headers.insert(name.clone(), value.clone());
        }

        if let Some((_, prefix_map)) = self
            .prefix_headers
            .iter()
            .find(|(prefix, _)| uri.starts_with(prefix.as_str()))
        {
            for (name, value) in prefix_map {
                headers.insert(name.clone(), value.clone());
            }
        }

        headers
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns.iter().map(|p| compile(p)).collect()
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthEntry;

    fn policy_with(config: Config) -> Policy {
        Policy::from_config(&config).unwrap()
    }

    #[test]
    fn test_ignore_matches_anywhere() {
        let mut config = Config::default();
        config.ignore = vec!["doesnotexist".to_string(), "^https://internal".to_string()];
        let policy = policy_with(config);

        assert!(policy.is_ignored("https://localhost:7777/doesnotexist"));
        assert!(policy.is_ignored("https://internal.example.com/page"));
        assert!(!policy.is_ignored("https://example.com/exists"));
    }

    #[test]
    fn test_no_ignore_rules_matches_nothing() {
        let policy = policy_with(Config::default());
        assert!(!policy.is_ignored("https://example.com/"));
    }

    #[test]
    fn test_default_anchor_exemption_covers_shebang() {
        let policy = policy_with(Config::default());
        assert!(policy.anchor_exempt("!bar"));
        assert!(!policy.anchor_exempt("top"));
    }

    #[test]
    fn test_anchor_exemption_with_custom_patterns() {
        let mut config = Config::default();
        config.anchor_ignore = vec!["^!".to_string(), "^top$".to_string()];
        let policy = policy_with(config);

        assert!(policy.anchor_exempt("top"));
        assert!(policy.anchor_exempt("!bar"));
        assert!(!policy.anchor_exempt("topics"));
    }

    #[test]
    fn test_auth_first_match_wins() {
        let mut config = Config::default();
        config.auth = vec![
            AuthEntry {
                pattern: r".+example\.com/image.+".to_string(),
                username: "imageuser".to_string(),
                password: Some("imagepass".to_string()),
            },
            AuthEntry {
                pattern: r".+example\.com.+".to_string(),
                username: "siteuser".to_string(),
                password: None,
            },
        ];
        let policy = policy_with(config);

        // Matches both rules; the one declared first supplies the credential
        let credential = policy.auth_for("https://example.com/image.png").unwrap();
        assert_eq!(credential.username, "imageuser");

        let credential = policy.auth_for("https://example.com/page").unwrap();
        assert_eq!(credential.username, "siteuser");

        assert!(policy.auth_for("https://other.org/page").is_none());
    }

    #[test]
    fn test_headers_default_accept_only() {
        let policy = policy_with(Config::default());
        let headers = policy.headers_for("https://example.com/");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers["Accept"], DEFAULT_ACCEPT);
    }

    #[test]
    fn test_headers_wildcard_applies_everywhere() {
        let mut config = Config::default();
        config.headers.insert(
            "*".to_string(),
            HashMap::from([("X-Secret".to_string(), "open sesami".to_string())]),
        );
        let policy = policy_with(config);

        let headers = policy.headers_for("https://anywhere.example/page");
        assert_eq!(headers["Accept"], DEFAULT_ACCEPT);
        assert_eq!(headers["X-Secret"], "open sesami");
    }

    #[test]
    fn test_headers_prefix_overrides_and_accumulates() {
        let mut config = Config::default();
        config.headers.insert(
            "*".to_string(),
            HashMap::from([("X-Secret".to_string(), "open sesami".to_string())]),
        );
        config.headers.insert(
            "https://localhost:7777/".to_string(),
            HashMap::from([("Accept".to_string(), "text/html".to_string())]),
        );
        let policy = policy_with(config);

        // Prefix entry overrides the baseline Accept, wildcard still applies
        let headers = policy.headers_for("https://localhost:7777/page");
        assert_eq!(headers["Accept"], "text/html");
        assert_eq!(headers["X-Secret"], "open sesami");

        // Unrelated host keeps the baseline plus the wildcard
        let headers = policy.headers_for("https://example.com/page");
        assert_eq!(headers["Accept"], DEFAULT_ACCEPT);
        assert_eq!(headers["X-Secret"], "open sesami");
    }

    #[test]
    fn test_headers_longest_prefix_wins() {
        let mut config = Config::default();
        config.headers.insert(
            "https://example.com/".to_string(),
            HashMap::from([("Accept".to_string(), "application/json".to_string())]),
        );
        config.headers.insert(
            "https://example.com/docs/".to_string(),
            HashMap::from([("Accept".to_string(), "text/html".to_string())]),
        );
        let policy = policy_with(config);

        let headers = policy.headers_for("https://example.com/docs/page");
        assert_eq!(headers["Accept"], "text/html");

        let headers = policy.headers_for("https://example.com/other");
        assert_eq!(headers["Accept"], "application/json");
    }

    #[test]
    fn test_headers_prefix_without_trailing_slash() {
        let mut config = Config::default();
        config.headers.insert(
            "http://www.example.org".to_string(),
            HashMap::from([("Accept".to_string(), "application/json".to_string())]),
        );
        let policy = policy_with(config);

        let headers = policy.headers_for("http://www.example.org/en/intro.html");
        assert_eq!(headers["Accept"], "application/json");
    }
}
