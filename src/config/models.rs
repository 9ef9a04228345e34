use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Directory holding the built page assets.
    #[serde(default = "default_site_root")]
    pub site_root: String,
    /// Backend API origin. The `API_UPSTREAM_URL` environment variable takes
    /// precedence over this value at load time.
    #[serde(default)]
    pub upstream: Option<String>,
    /// Evaluated in declaration order; the first matching rule wins.
    #[serde(default)]
    pub rewrites: Vec<RewriteRuleConfig>,
}

fn default_site_root() -> String {
    "site".to_string()
}

impl ServerConfig {
    /// Create a new server configuration builder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

/// A declarative mapping from an inbound path pattern to a destination template.
///
/// The source is a literal prefix followed by the greedy capture marker
/// `:path*` (e.g. `/api/:path*`). The destination re-injects the captured
/// remainder after the target origin (e.g. `${upstream}/:path*`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteRuleConfig {
    pub source: String,
    pub destination: String,
}

/// Builder for ServerConfig to allow for cleaner configuration creation
#[derive(Default)]
pub struct ServerConfigBuilder {
    listen_addr: Option<String>,
    site_root: Option<String>,
    upstream: Option<String>,
    rewrites: Vec<RewriteRuleConfig>,
}

impl ServerConfigBuilder {
    /// Set the listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.listen_addr = Some(addr.into());
        self
    }

    /// Set the site root directory
    pub fn site_root(mut self, root: impl Into<String>) -> Self {
        self.site_root = Some(root.into());
        self
    }

    /// Set the configured upstream origin
    pub fn upstream(mut self, origin: impl Into<String>) -> Self {
        self.upstream = Some(origin.into());
        self
    }

    /// Append a rewrite rule; order of calls is the evaluation order
    pub fn rewrite(mut self, source: impl Into<String>, destination: impl Into<String>) -> Self {
        self.rewrites.push(RewriteRuleConfig {
            source: source.into(),
            destination: destination.into(),
        });
        self
    }

    /// Build the final ServerConfig
    pub fn build(self) -> Result<ServerConfig, String> {
        let listen_addr = self
            .listen_addr
            .ok_or_else(|| "listen_addr is required".to_string())?;

        Ok(ServerConfig {
            listen_addr,
            site_root: self.site_root.unwrap_or_else(default_site_root),
            upstream: self.upstream,
            rewrites: self.rewrites,
        })
    }
}
