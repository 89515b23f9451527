//! Session authorization for the DevConnect API
//!
//! Issues short-lived signed session tokens carried in an HTTP-only cookie,
//! verifies them on protected routes through an axum extractor, and offers
//! the per-route ownership check that compares the caller's identity with
//! the identity named in the request.

mod authorizer;
mod claims;
mod config;
mod context;
mod cookie;
mod error;
mod extractors;
mod jwt;

pub use authorizer::SessionAuthorizer;
pub use claims::SessionClaims;
pub use config::AuthConfig;
pub use context::AuthContext;
pub use cookie::SESSION_COOKIE_NAME;
pub use error::AuthError;
pub use extractors::SessionUser;
