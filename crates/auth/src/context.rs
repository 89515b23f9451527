//! Identity resolved from a verified session

use chrono::{DateTime, Utc};

use crate::claims::SessionClaims;
use crate::error::AuthError;

/// Represents the caller behind a verified session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub email: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthContext {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            expires_at: None,
        }
    }

    /// Check that the caller is the identity a route was asked about.
    ///
    /// Each protected route names its own query parameter; an absent
    /// parameter never matches.
    pub fn ensure_owner(&self, requested: Option<&str>) -> Result<(), AuthError> {
        match requested {
            Some(email) if email == self.email => Ok(()),
            _ => {
                tracing::debug!(
                    caller = %self.email,
                    requested = requested.unwrap_or("<none>"),
                    "Ownership check failed"
                );
                Err(AuthError::Forbidden)
            }
        }
    }
}

impl From<SessionClaims> for AuthContext {
    fn from(claims: SessionClaims) -> Self {
        let expires_at = i64::try_from(claims.exp)
            .ok()
            .and_then(|exp| DateTime::from_timestamp(exp, 0));

        Self {
            email: claims.email,
            expires_at,
        }
    }
}
