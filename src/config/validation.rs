//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, bind address parses)
//! - Check scrape paths are absolute
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ServiceConfig;

/// A single semantic problem found in a parsed config.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("observability.scrape_paths entry '{0}' must start with '/'")]
    RelativeScrapePath(String),

    #[error("observability.scrape_paths must not be empty")]
    NoScrapePaths,

    #[error("auth token for user '{0}' is empty")]
    EmptyAuthToken(String),
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.observability.scrape_paths.is_empty() {
        errors.push(ValidationError::NoScrapePaths);
    }
    for path in &config.observability.scrape_paths {
        if !path.starts_with('/') {
            errors.push(ValidationError::RelativeScrapePath(path.clone()));
        }
    }

    for (token, user) in &config.auth.tokens {
        if token.is_empty() {
            errors.push(ValidationError::EmptyAuthToken(user.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ServiceConfig::default()).is_ok());
    }

    #[test]
    fn collects_multiple_errors() {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "not-an-address".to_string();
        config.timeouts.request_secs = 0;
        config.observability.scrape_paths = vec!["api/metrics".to_string()];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::ZeroRequestTimeout));
        assert!(errors.contains(&ValidationError::RelativeScrapePath(
            "api/metrics".to_string()
        )));
    }

    #[test]
    fn empty_scrape_list_is_rejected() {
        let mut config = ServiceConfig::default();
        config.observability.scrape_paths.clear();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::NoScrapePaths));
    }
}
