//! Link prober: resolves one link reference to exactly one classification
//!
//! This module performs the network exchange for a single URI:
//! - HEAD request with a GET fallback when the server rejects HEAD
//! - Manual redirect following with a bounded hop count
//! - Anchor validation through the anchor resolver
//! - Retry logic for transient transport failures
//! - Error classification into the report status taxonomy

use crate::checker::anchors::page_has_anchor;
use crate::checker::types::{CheckResult, CheckStatus, LinkReference};
use crate::config::CheckerConfig;
use crate::policy::{Credential, Policy};
use reqwest::{redirect, Client, Method, RequestBuilder, Response, StatusCode};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Delay between retry attempts for transient failures
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Classification of one probe
///
/// Exactly one outcome is produced per probed URI; the scheduler turns it
/// into a [`CheckResult`] for the reference that requested it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Target reachable, anchor present if required
    Working,

    /// URI matched an ignore rule; no request was made
    Ignored,

    /// HTTP failure, exhausted connection failure, or missing anchor
    Broken { code: u16, info: String },

    /// First hop was a redirect and the chain ended on a success
    ///
    /// `code` is the first hop's HTTP status, kept for the text report's
    /// reason phrase; the structured report does not expose it.
    Redirected { code: u16, target: String },

    /// Request deadline exceeded after the retry budget ran out
    Timeout { info: String },

    /// URI could not be parsed; never probed
    Unknown { info: String },
}

impl ProbeOutcome {
    /// Pairs this outcome with the reference that produced it
    pub fn into_result(self, reference: &LinkReference) -> CheckResult {
        match self {
            ProbeOutcome::Working => {
                CheckResult::new(reference, CheckStatus::Working, 0, String::new())
            }
            ProbeOutcome::Ignored => {
                CheckResult::new(reference, CheckStatus::Ignored, 0, String::new())
            }
            ProbeOutcome::Broken { code, info } => {
                CheckResult::new(reference, CheckStatus::Broken, code, info)
            }
            ProbeOutcome::Redirected { code, target } => {
                CheckResult::new(reference, CheckStatus::Redirected, code, target)
            }
            ProbeOutcome::Timeout { info } => {
                CheckResult::new(reference, CheckStatus::Timeout, 0, info)
            }
            ProbeOutcome::Unknown { info } => {
                CheckResult::new(reference, CheckStatus::Unknown, 0, info)
            }
        }
    }
}

/// Builds the HTTP client shared by all check workers
///
/// Redirects are handled manually so the first hop can be reported; the
/// client itself never follows them.
pub fn build_http_client(config: &CheckerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout))
        .connect_timeout(Duration::from_secs(10))
        .redirect(redirect::Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Headers and credential resolved once per reference
///
/// Resolution happens against the URI exactly as written, fragment
/// included; every request of the probe, redirect hops included, reuses
/// the same set.
struct RequestRules {
    headers: HashMap<String, String>,
    credential: Option<Credential>,
}

/// Probes one URI at a time using the shared client and frozen policy
pub struct Prober {
    client: Client,
    config: CheckerConfig,
    policy: Arc<Policy>,
}

impl Prober {
    pub fn new(client: Client, config: CheckerConfig, policy: Arc<Policy>) -> Self {
        Self {
            client,
            config,
            policy,
        }
    }

    /// Resolves one URI to its classification
    ///
    /// # Probe sequence
    ///
    /// 1. Ignore-rule match short-circuits with no I/O
    /// 2. Unparsable URIs classify `Unknown` without a request
    /// 3. A non-exempt fragment takes the anchor path: GET the page and
    ///    scan it for the fragment
    /// 4. Everything else takes the reachability path: HEAD with a GET
    ///    fallback, following redirects up to the configured hop bound
    pub async fn probe(&self, uri: &str) -> ProbeOutcome {
        if self.policy.is_ignored(uri) {
            tracing::debug!("Ignoring {} per ignore rules", uri);
            return ProbeOutcome::Ignored;
        }

        let parsed = match Url::parse(uri) {
            Ok(url) => url,
            Err(e) => {
                return ProbeOutcome::Unknown {
                    info: e.to_string(),
                }
            }
        };

        let rules = RequestRules {
            headers: self.policy.headers_for(uri),
            credential: self.policy.auth_for(uri).cloned(),
        };

        let fragment = parsed.fragment().map(str::to_string);
        let mut request_url = parsed;
        request_url.set_fragment(None);

        match fragment {
            Some(anchor)
                if self.config.check_anchors
                    && !anchor.is_empty()
                    && !self.policy.anchor_exempt(&anchor) =>
            {
                self.probe_anchor(request_url, &anchor, &rules).await
            }
            _ => self.probe_reachability(request_url, &rules).await,
        }
    }

    /// Anchor path: GET the page (following redirects) and scan the body
    ///
    /// The anchor path never reports `Redirected`; a page that redirects
    /// and then serves the anchor is a working link.
    async fn probe_anchor(&self, url: Url, anchor: &str, rules: &RequestRules) -> ProbeOutcome {
        let mut current = url.clone();
        let mut hops = 0;

        loop {
            let response = match self.send_with_retries(Method::GET, &current, rules).await {
                Ok(response) => response,
                Err(outcome) => return outcome,
            };

            let status = response.status();

            if status.is_redirection() {
                match redirect_target(&response, &current) {
                    Some(next) => {
                        hops += 1;
                        if hops > self.config.max_redirects {
                            return too_many_redirects(&url, self.config.max_redirects);
                        }
                        current = next;
                        continue;
                    }
                    None => return missing_location(status, &current),
                }
            }

            if status.is_success() {
                let body = match response.text().await {
                    Ok(body) => body,
                    Err(e) => return classify_transport_error(e),
                };
                return if page_has_anchor(&body, anchor) {
                    ProbeOutcome::Working
                } else {
                    ProbeOutcome::Broken {
                        code: 0,
                        info: format!("Anchor '{}' not found", anchor),
                    }
                };
            }

            return ProbeOutcome::Broken {
                code: status.as_u16(),
                info: http_error_info(status, &current),
            };
        }
    }

    /// Reachability path: HEAD→GET fallback at every hop of the chain
    ///
    /// The first redirect hop is what gets reported; the rest of the
    /// chain is only followed to confirm the target actually resolves.
    async fn probe_reachability(&self, url: Url, rules: &RequestRules) -> ProbeOutcome {
        let mut current = url.clone();
        let mut first_redirect: Option<(u16, String)> = None;
        let mut hops = 0;

        loop {
            let response = match self.request_with_fallback(&current, rules).await {
                Ok(response) => response,
                Err(outcome) => return outcome,
            };

            let status = response.status();

            if status.is_redirection() {
                let next = match redirect_target(&response, &current) {
                    Some(next) => next,
                    None => return missing_location(status, &current),
                };

                if first_redirect.is_none() {
                    first_redirect = Some((status.as_u16(), next.to_string()));
                }

                hops += 1;
                if hops > self.config.max_redirects {
                    return too_many_redirects(&url, self.config.max_redirects);
                }

                current = next;
                continue;
            }

            if status.is_success() {
                return match first_redirect {
                    Some((code, target)) => ProbeOutcome::Redirected { code, target },
                    None => ProbeOutcome::Working,
                };
            }

            return ProbeOutcome::Broken {
                code: status.as_u16(),
                info: http_error_info(status, &current),
            };
        }
    }

    /// Sends a HEAD request, falling back to GET when the server answers
    /// HEAD with any 4xx/5xx
    async fn request_with_fallback(
        &self,
        url: &Url,
        rules: &RequestRules,
    ) -> Result<Response, ProbeOutcome> {
        let head = self.send_with_retries(Method::HEAD, url, rules).await?;
        let status = head.status();

        if status.is_client_error() || status.is_server_error() {
            tracing::debug!("HEAD {} answered {}, retrying with GET", url, status);
            return self.send_with_retries(Method::GET, url, rules).await;
        }

        Ok(head)
    }

    /// Sends one request, retrying transient transport failures up to the
    /// configured budget
    async fn send_with_retries(
        &self,
        method: Method,
        url: &Url,
        rules: &RequestRules,
    ) -> Result<Response, ProbeOutcome> {
        let mut attempt = 0;

        loop {
            match self.build_request(method.clone(), url, rules).send().await {
                Ok(response) => return Ok(response),
                Err(e) if is_transient(&e) && attempt < self.config.retries => {
                    attempt += 1;
                    tracing::debug!(
                        "Transient failure for {} (attempt {}/{}): {}",
                        url,
                        attempt,
                        self.config.retries,
                        e
                    );
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e) => return Err(classify_transport_error(e)),
            }
        }
    }

    /// Builds a request carrying the headers and credential resolved for
    /// the original URI
    fn build_request(&self, method: Method, url: &Url, rules: &RequestRules) -> RequestBuilder {
        let mut request = self.client.request(method, url.clone());

        for (name, value) in &rules.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        if let Some(credential) = &rules.credential {
            request = request.basic_auth(&credential.username, credential.password.as_deref());
        }

        request
    }
}

/// Transient failures are worth retrying; everything else is final
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect()
}

/// Maps an exhausted transport error to its terminal classification
fn classify_transport_error(e: reqwest::Error) -> ProbeOutcome {
    if e.is_timeout() {
        ProbeOutcome::Timeout {
            info: e.to_string(),
        }
    } else {
        ProbeOutcome::Broken {
            code: 0,
            info: e.to_string(),
        }
    }
}

/// Resolves the Location header of a redirect against the current URL
fn redirect_target(response: &Response, current: &Url) -> Option<Url> {
    let location = response
        .headers()
        .get(reqwest::header::LOCATION)?
        .to_str()
        .ok()?;
    current.join(location).ok()
}

/// Error text for a terminal 4xx/5xx, e.g.
/// `404 Client Error: Not Found for url: https://example.com/missing`
fn http_error_info(status: StatusCode, url: &Url) -> String {
    let class = if status.is_server_error() {
        "Server Error"
    } else {
        "Client Error"
    };

    match status.canonical_reason() {
        Some(reason) => format!("{} {}: {} for url: {}", status.as_u16(), class, reason, url),
        None => format!("{} {} for url: {}", status.as_u16(), class, url),
    }
}

fn missing_location(status: StatusCode, url: &Url) -> ProbeOutcome {
    ProbeOutcome::Broken {
        code: status.as_u16(),
        info: format!("Redirect without Location for url: {}", url),
    }
}

fn too_many_redirects(url: &Url, limit: u32) -> ProbeOutcome {
    ProbeOutcome::Broken {
        code: 0,
        info: format!("Exceeded {} redirects for url: {}", limit, url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let config = CheckerConfig::default();
        let client = build_http_client(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_http_error_info_client_error() {
        let url = Url::parse("https://example.com/missing").unwrap();
        let info = http_error_info(StatusCode::NOT_FOUND, &url);
        assert_eq!(
            info,
            "404 Client Error: Not Found for url: https://example.com/missing"
        );
    }

    #[test]
    fn test_http_error_info_server_error() {
        let url = Url::parse("http://localhost:7777/").unwrap();
        let info = http_error_info(StatusCode::INTERNAL_SERVER_ERROR, &url);
        assert_eq!(
            info,
            "500 Server Error: Internal Server Error for url: http://localhost:7777/"
        );
    }

    #[test]
    fn test_outcome_into_result_redirected_keeps_hop_code() {
        let reference = LinkReference {
            filename: "links.txt".to_string(),
            lineno: 3,
            uri: "http://example.com/".to_string(),
        };

        let result = ProbeOutcome::Redirected {
            code: 302,
            target: "http://example.com/new".to_string(),
        }
        .into_result(&reference);

        assert_eq!(result.status, CheckStatus::Redirected);
        assert_eq!(result.code, 302);
        assert_eq!(result.info, "http://example.com/new");
    }

    #[test]
    fn test_outcome_into_result_working_is_clean() {
        let reference = LinkReference {
            filename: "links.txt".to_string(),
            lineno: 1,
            uri: "http://example.com/".to_string(),
        };

        let result = ProbeOutcome::Working.into_result(&reference);
        assert_eq!(result.status, CheckStatus::Working);
        assert_eq!(result.code, 0);
        assert_eq!(result.info, "");
    }
}
