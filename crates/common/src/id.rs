//! Store-assigned document identifiers
//!
//! Path segments arrive as untrusted strings. They are parsed into a
//! `DocumentId` before any store call so a malformed id is a client error
//! instead of a store failure.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Length of the hyphenated text form, the only form accepted from clients
const HYPHENATED_LEN: usize = 36;

/// Opaque identifier of a stored job posting or application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier taken from a request path.
    ///
    /// Only the hyphenated `8-4-4-4-12` text form is accepted; braced, URN,
    /// unhyphenated and padded spellings are rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || Error::Validation(format!("Invalid document id: {raw}"));

        if raw.len() != HYPHENATED_LEN {
            return Err(invalid());
        }
        Uuid::try_parse(raw).map(Self).map_err(|_| invalid())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for DocumentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for DocumentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
