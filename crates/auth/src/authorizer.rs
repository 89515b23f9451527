//! Session authorizer
//!
//! Owns the signing configuration. Tokens are never stored server-side:
//! logout only clears the caller's cookie, and an issued token stays valid
//! until it expires.

use axum_extra::extract::cookie::Cookie;

use crate::config::AuthConfig;
use crate::context::AuthContext;
use crate::cookie::{cleared_cookie, session_cookie};
use crate::error::AuthError;
use crate::jwt::{issue_jwt_token, validate_jwt_token};

/// Issues and verifies session tokens.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for SessionAuthorizer {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SessionAuthorizer {
    config: AuthConfig,
}

impl SessionAuthorizer {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Sign a token for `email`, valid from now for the configured lifetime
    pub fn issue(&self, email: &str) -> Result<String, AuthError> {
        issue_jwt_token(email, chrono::Utc::now().timestamp(), &self.config)
    }

    /// Sign a token and wrap it in the session cookie
    pub fn issue_cookie(&self, email: &str) -> Result<Cookie<'static>, AuthError> {
        let token = self.issue(email)?;
        tracing::debug!(email = %email, "Session token issued");
        Ok(session_cookie(token, self.config.token_ttl_secs))
    }

    /// Cookie that ends the session on the client
    pub fn revoke_cookie(&self) -> Cookie<'static> {
        cleared_cookie()
    }

    /// Verify a token and resolve the caller it names
    pub fn verify(&self, token: &str) -> Result<AuthContext, AuthError> {
        validate_jwt_token(token, &self.config).map(AuthContext::from)
    }
}
