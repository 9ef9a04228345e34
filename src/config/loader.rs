use std::path::Path;
use thiserror::Error;
use tokio::fs;

use crate::config::models::ServerConfig;

/// Fallback origin when neither the environment nor the config file names one.
pub const DEFAULT_UPSTREAM: &str = "http://localhost:8000";

/// Environment variable carrying the backend API origin.
pub const UPSTREAM_ENV_VAR: &str = "API_UPSTREAM_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML config: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

pub async fn load_config<P: AsRef<Path>>(path: P) -> ConfigResult<ServerConfig> {
    let config_content = fs::read_to_string(path).await?;
    let config: ServerConfig = serde_yaml::from_str(&config_content)?;
    Ok(config)
}

/// Resolve the upstream origin exactly once, at config-load time.
///
/// Precedence: environment variable, then the config file value, then
/// [`DEFAULT_UPSTREAM`]. A set-but-empty value counts as unset. A non-empty
/// value is taken verbatim: no trimming, no normalization. The value is not
/// checked for well-formedness here; a malformed origin surfaces as a
/// per-request forwarding failure.
pub fn resolve_upstream(env_value: Option<&str>, configured: Option<&str>) -> String {
    for candidate in [env_value, configured].into_iter().flatten() {
        if !candidate.is_empty() {
            return candidate.to_string();
        }
    }
    DEFAULT_UPSTREAM.to_string()
}
