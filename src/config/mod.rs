pub mod loader;
pub mod models;
pub mod validation;

pub use loader::{ConfigError, DEFAULT_UPSTREAM, UPSTREAM_ENV_VAR, load_config, resolve_upstream};
pub use models::{RewriteRuleConfig, ServerConfig};
pub use validation::{ConfigValidator, ValidationError};
