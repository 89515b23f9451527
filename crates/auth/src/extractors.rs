//! Axum extractors for session authorization
//!
//! Generic over any state `S` where `SessionAuthorizer: FromRef<S>`.
//! A failed verification rejects the request before the handler runs.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;

use crate::authorizer::SessionAuthorizer;
use crate::context::AuthContext;
use crate::cookie::SESSION_COOKIE_NAME;
use crate::error::AuthError;

/// Caller resolved from the session cookie
#[derive(Debug)]
pub struct SessionUser(pub AuthContext);

impl<S> FromRequestParts<S> for SessionUser
where
    SessionAuthorizer: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let authorizer = SessionAuthorizer::from_ref(state);

        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE_NAME)
            .map(|cookie| cookie.value())
            .filter(|value| !value.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let auth_context = authorizer.verify(token)?;

        Ok(SessionUser(auth_context))
    }
}
