//! Session lookup boundary.
//!
//! # Responsibilities
//! - Resolve a bearer token to a user identity, or an auth error
//! - Keep the session provider behind a trait so handlers never know
//!   which backend answered
//!
//! # Design Decisions
//! - `SessionService` mirrors a hosted auth provider's `get_user()` call;
//!   nothing else (no refresh, no token issuance) is modeled here
//! - The in-tree implementation is a static token table from config, with
//!   an optional fallback user so local development needs no tokens

use std::collections::HashMap;

use crate::config::schema::AuthConfig;

/// Errors a session lookup can produce.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid or expired session")]
    InvalidToken,
}

/// A `get_user()`-style session lookup.
pub trait SessionService: Send + Sync {
    /// Resolve the request's bearer token (if any) to a user id.
    fn get_user(&self, bearer: Option<&str>) -> Result<String, AuthError>;
}

/// Session service backed by a static token table.
pub struct StaticTokenSessions {
    tokens: HashMap<String, String>,
    dev_user: Option<String>,
}

impl StaticTokenSessions {
    pub fn new(config: &AuthConfig) -> Self {
        let dev_user = config
            .dev_user
            .as_ref()
            .filter(|u| !u.is_empty())
            .cloned();
        Self {
            tokens: config.tokens.clone(),
            dev_user,
        }
    }
}

impl SessionService for StaticTokenSessions {
    fn get_user(&self, bearer: Option<&str>) -> Result<String, AuthError> {
        match bearer {
            Some(token) => self
                .tokens
                .get(token)
                .cloned()
                .ok_or(AuthError::InvalidToken),
            None => self.dev_user.clone().ok_or(AuthError::MissingToken),
        }
    }
}
