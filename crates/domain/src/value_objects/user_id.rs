//! User identifier value object
//!
//! Identity-provider uids are opaque strings, not UUIDs; the only local
//! invariant is non-emptiness.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A unique user identifier issued by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a user ID from a provider-issued uid
    ///
    /// # Errors
    ///
    /// Returns an error if the uid is empty after trimming.
    pub fn new(uid: impl Into<String>) -> Result<Self, DomainError> {
        let uid = uid.into().trim().to_string();
        if uid.is_empty() {
            return Err(DomainError::InvalidIdentifier(
                "user id must not be empty".to_string(),
            ));
        }
        Ok(Self(uid))
    }

    /// Get the uid as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for UserId {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
