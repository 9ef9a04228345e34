use std::net::SocketAddr;
use thiserror::Error;

use crate::config::models::{RewriteRuleConfig, ServerConfig};
use crate::core::rewrite::CAPTURE_MARKER;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Configuration validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid listen address: {address} - {reason}")]
    InvalidListenAddress { address: String, reason: String },

    #[error("Rewrite rule conflict: {message}")]
    RuleConflict { message: String },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validator with detailed error reporting.
///
/// The upstream origin value is deliberately not validated here: a malformed
/// origin only manifests when a forwarded request fails.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete server configuration
    pub fn validate(config: &ServerConfig) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_listen_address(&config.listen_addr) {
            errors.push(e);
        }

        if config.site_root.is_empty() {
            errors.push(ValidationError::MissingField {
                field: "site_root".to_string(),
            });
        }

        if config.rewrites.is_empty() {
            errors.push(ValidationError::MissingField {
                field: "rewrites".to_string(),
            });
        } else {
            for (i, rule) in config.rewrites.iter().enumerate() {
                if let Err(mut rule_errors) = Self::validate_single_rule(i, rule) {
                    errors.append(&mut rule_errors);
                }
            }
        }

        if let Err(mut conflict_errors) = Self::check_rule_order(&config.rewrites) {
            errors.append(&mut conflict_errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::ValidationFailed {
                message: Self::format_multiple_errors(errors),
            })
        }
    }

    /// Validate listen address format
    fn validate_listen_address(address: &str) -> ValidationResult<()> {
        if address.parse::<SocketAddr>().is_err() {
            return Err(ValidationError::InvalidListenAddress {
                address: address.to_string(),
                reason: "Must be in format 'IP:PORT' (e.g., '127.0.0.1:3000' or '0.0.0.0:8080')"
                    .to_string(),
            });
        }
        Ok(())
    }

    /// Validate a single rewrite rule's pattern shape
    fn validate_single_rule(
        index: usize,
        rule: &RewriteRuleConfig,
    ) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if !rule.source.starts_with('/') {
            errors.push(ValidationError::InvalidField {
                field: format!("rewrites[{index}].source"),
                message: format!("'{}' must start with '/'", rule.source),
            });
        }

        if !rule.source.ends_with(CAPTURE_MARKER) {
            errors.push(ValidationError::InvalidField {
                field: format!("rewrites[{index}].source"),
                message: format!("'{}' must end with the capture '{CAPTURE_MARKER}'", rule.source),
            });
        }

        if !rule.destination.ends_with(CAPTURE_MARKER) {
            errors.push(ValidationError::InvalidField {
                field: format!("rewrites[{index}].destination"),
                message: format!(
                    "'{}' must end with the capture '{CAPTURE_MARKER}'",
                    rule.destination
                ),
            });
        } else if rule.destination.len() == CAPTURE_MARKER.len() {
            errors.push(ValidationError::InvalidField {
                field: format!("rewrites[{index}].destination"),
                message: "destination has no target in front of the capture".to_string(),
            });
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Reject rule orderings where an earlier rule shadows a later one.
    ///
    /// Rules are matched first-match-wins in declaration order, so a later
    /// rule whose prefix is covered by an earlier rule can never match.
    fn check_rule_order(rules: &[RewriteRuleConfig]) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let prefixes: Vec<&str> = rules
            .iter()
            .map(|r| r.source.strip_suffix(CAPTURE_MARKER).unwrap_or(&r.source))
            .collect();

        for (i, earlier) in prefixes.iter().enumerate() {
            for (j, later) in prefixes.iter().enumerate().skip(i + 1) {
                if later.starts_with(earlier) {
                    errors.push(ValidationError::RuleConflict {
                        message: format!(
                            "rule '{}' is unreachable: shadowed by earlier rule '{}'",
                            rules[j].source, rules[i].source
                        ),
                    });
                }
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Format multiple validation errors into a single message
    fn format_multiple_errors(errors: Vec<ValidationError>) -> String {
        let mut message = format!("Found {} validation error(s):\n", errors.len());
        for (i, error) in errors.iter().enumerate() {
            message.push_str(&format!("  {}. {}\n", i + 1, error));
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::models::ServerConfig;

    fn create_valid_config() -> ServerConfig {
        ServerConfig::builder()
            .listen_addr("127.0.0.1:3000")
            .rewrite("/api/:path*", "${upstream}/:path*")
            .build()
            .unwrap()
    }

    #[test]
    fn test_valid_config() {
        let config = create_valid_config();
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_listen_address() {
        let mut config = create_valid_config();
        config.listen_addr = "invalid_address".to_string();

        let result = ConfigValidator::validate(&config);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid listen address")
        );
    }

    #[test]
    fn test_missing_rewrites() {
        let mut config = create_valid_config();
        config.rewrites.clear();

        let result = ConfigValidator::validate(&config);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Missing required field: rewrites")
        );
    }

    #[test]
    fn test_source_without_leading_slash() {
        let config = ServerConfig::builder()
            .listen_addr("127.0.0.1:3000")
            .rewrite("api/:path*", "${upstream}/:path*")
            .build()
            .unwrap();

        let result = ConfigValidator::validate(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("must start with '/'"));
    }

    #[test]
    fn test_destination_without_capture() {
        let config = ServerConfig::builder()
            .listen_addr("127.0.0.1:3000")
            .rewrite("/api/:path*", "${upstream}/fixed")
            .build()
            .unwrap();

        let result = ConfigValidator::validate(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("destination"));
    }

    #[test]
    fn test_shadowed_rule_is_rejected() {
        // "/api/" covers "/api/v2/", so the second rule can never match.
        let config = ServerConfig::builder()
            .listen_addr("127.0.0.1:3000")
            .rewrite("/api/:path*", "${upstream}/:path*")
            .rewrite("/api/v2/:path*", "http://v2.internal/:path*")
            .build()
            .unwrap();

        let result = ConfigValidator::validate(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("unreachable"));
    }

    #[test]
    fn test_narrow_before_broad_is_accepted() {
        let config = ServerConfig::builder()
            .listen_addr("127.0.0.1:3000")
            .rewrite("/api/v2/:path*", "http://v2.internal/:path*")
            .rewrite("/api/:path*", "${upstream}/:path*")
            .build()
            .unwrap();

        assert!(ConfigValidator::validate(&config).is_ok());
    }
}
