//! Authorization errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use devconnect_common::Error;
use serde_json::json;

/// Authorization error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No session cookie on the request
    MissingToken,
    /// Bad signature, malformed token, or past expiry
    InvalidToken,
    /// Caller identity differs from the identity named in the request
    Forbidden,
    /// Signing a new token failed
    TokenIssueFailed,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "MISSING_TOKEN",
                "Unauthorized access",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid or expired token",
            ),
            AuthError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Forbidden access",
            ),
            AuthError::TokenIssueFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "TOKEN_ISSUE_FAILED",
                "Failed to issue session token",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => Error::Authentication("Unauthorized access".to_string()),
            AuthError::InvalidToken => {
                Error::Authentication("Invalid or expired token".to_string())
            }
            AuthError::Forbidden => Error::Authorization("Forbidden access".to_string()),
            AuthError::TokenIssueFailed => {
                Error::Internal("Failed to issue session token".to_string())
            }
        }
    }
}
