use thiserror::Error;

use crate::config::models::RewriteRuleConfig;

/// Greedy capture marker terminating a rule's source pattern and destination
/// template: everything after the literal prefix, zero or more segments.
pub const CAPTURE_MARKER: &str = ":path*";

/// Placeholder substituted with the resolved upstream origin at compile time.
pub const UPSTREAM_PLACEHOLDER: &str = "${upstream}";

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("Rewrite source '{0}' does not end with the capture ':path*'")]
    SourceMissingCapture(String),

    #[error("Rewrite destination '{0}' does not end with the capture ':path*'")]
    DestinationMissingCapture(String),
}

/// A compiled rewrite rule: a literal path prefix and the destination prefix
/// the captured remainder is appended to.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    prefix: String,
    target_prefix: String,
}

impl RewriteRule {
    /// Compile a configured rule against the resolved upstream origin.
    ///
    /// Only the pattern shape is checked. The origin itself is spliced in
    /// verbatim; a malformed origin fails later, at forwarding time.
    pub fn compile(
        rule: &RewriteRuleConfig,
        upstream: &str,
    ) -> Result<Self, RewriteError> {
        let prefix = rule
            .source
            .strip_suffix(CAPTURE_MARKER)
            .ok_or_else(|| RewriteError::SourceMissingCapture(rule.source.clone()))?;

        let destination = rule.destination.replace(UPSTREAM_PLACEHOLDER, upstream);
        let target_prefix = destination
            .strip_suffix(CAPTURE_MARKER)
            .ok_or_else(|| RewriteError::DestinationMissingCapture(rule.destination.clone()))?;

        Ok(Self {
            prefix: prefix.to_string(),
            target_prefix: target_prefix.to_string(),
        })
    }

    /// Match a request path against this rule's prefix.
    ///
    /// Returns the captured remainder on a match. A path equal to the prefix
    /// minus its trailing slash (`/api` for prefix `/api/`) matches with an
    /// empty capture, so the bare mount point is forwarded too.
    fn capture<'p>(&self, path: &'p str) -> Option<&'p str> {
        if let Some(rest) = path.strip_prefix(self.prefix.as_str()) {
            return Some(rest);
        }
        if let Some(bare) = self.prefix.strip_suffix('/') {
            if path == bare {
                return Some("");
            }
        }
        None
    }

    /// Synthesize the destination for a captured remainder.
    ///
    /// The remainder and the raw query string are carried over byte-for-byte:
    /// no percent-decoding, re-encoding, or slash normalization happens here,
    /// so the origin sees the same path structure the client requested.
    fn apply(&self, captured: &str, query: Option<&str>) -> String {
        match query {
            Some(q) => format!("{}{}?{}", self.target_prefix, captured, q),
            None => format!("{}{}", self.target_prefix, captured),
        }
    }
}

/// The ordered rewrite table consulted on every request.
///
/// Compiled once at startup and immutable afterwards; any number of in-flight
/// requests may scan it concurrently without synchronization.
#[derive(Debug, Clone)]
pub struct RewriteTable {
    rules: Vec<RewriteRule>,
}

impl RewriteTable {
    pub fn compile(rules: &[RewriteRuleConfig], upstream: &str) -> Result<Self, RewriteError> {
        let rules = rules
            .iter()
            .map(|rule| RewriteRule::compile(rule, upstream))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolve a request path (and raw query) to a forwarding destination.
    ///
    /// Linear scan in declaration order, first match wins. `None` means the
    /// request belongs to the application's own page routing.
    pub fn resolve(&self, path: &str, query: Option<&str>) -> Option<String> {
        self.rules
            .iter()
            .find_map(|rule| rule.capture(path).map(|captured| rule.apply(captured, query)))
    }
}
