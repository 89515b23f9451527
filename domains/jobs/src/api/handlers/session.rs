//! Session API handlers
//!
//! Implements:
//! - POST /api/v1/auth/jwt: issue a session cookie for the supplied identity
//! - POST /api/v1/auth/logout: clear the session cookie

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use devconnect_common::{JsonBody, Result};
use serde::{Deserialize, Serialize};

use crate::api::middleware::JobsState;

/// Identity claim supplied at login. Any other fields in the body are
/// ignored and never signed.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
}

/// POST /api/v1/auth/jwt
pub async fn login(
    State(state): State<JobsState>,
    jar: CookieJar,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let cookie = state.auth.issue_cookie(&request.email)?;
    Ok((jar.add(cookie), Json(SessionResponse { success: true })))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<JobsState>,
    jar: CookieJar,
) -> (CookieJar, Json<SessionResponse>) {
    tracing::debug!("Session cookie cleared");
    (
        jar.add(state.auth.revoke_cookie()),
        Json(SessionResponse { success: true }),
    )
}
