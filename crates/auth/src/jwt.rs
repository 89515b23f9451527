//! JWT signing and validation helpers

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::SessionClaims;
use crate::config::AuthConfig;
use crate::error::AuthError;

/// Sign a session token for `email`, issued at `issued_at` (epoch seconds)
pub(crate) fn issue_jwt_token(
    email: &str,
    issued_at: i64,
    config: &AuthConfig,
) -> Result<String, AuthError> {
    let iat = u64::try_from(issued_at).map_err(|_| AuthError::TokenIssueFailed)?;
    let ttl = u64::try_from(config.token_ttl_secs).map_err(|_| AuthError::TokenIssueFailed)?;

    let claims = SessionClaims {
        email: email.to_string(),
        iat,
        exp: iat + ttl,
    };

    let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_ref());

    encode(&Header::new(Algorithm::HS256), &claims, &encoding_key).map_err(|e| {
        tracing::error!(error = %e, "JWT signing failed");
        AuthError::TokenIssueFailed
    })
}

/// Validate a session token's signature and expiry
pub(crate) fn validate_jwt_token(
    token: &str,
    config: &AuthConfig,
) -> Result<SessionClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_ref());

    let token_data = decode::<SessionClaims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "JWT validation failed");
        AuthError::InvalidToken
    })?;

    Ok(token_data.claims)
}
