//! Session token claims

use serde::{Deserialize, Serialize};

/// Claims signed into every session token.
///
/// The shape is fixed: whatever else a login body carries is never signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Caller identity
    pub email: String,
    /// Issued at (seconds since epoch)
    pub iat: u64,
    /// Expires at (seconds since epoch)
    pub exp: u64,
}
