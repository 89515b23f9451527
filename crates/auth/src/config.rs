//! Session authorization configuration

use std::fmt;

/// Session lifetime used when none is configured
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60;

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// How long an issued token (and its cookie) stays valid
    pub token_ttl_secs: i64,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}
