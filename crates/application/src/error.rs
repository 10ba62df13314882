//! Application-level errors

use domain::DomainError;
use thiserror::Error;

use crate::ports::AuthError;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A mutating favorites operation was attempted without a signed-in user
    #[error("No user is signed in")]
    Unauthenticated,

    /// No per-user favorites path can be resolved
    #[error("No favorites path for the current user")]
    InvalidReference,

    /// The city name is not in the directory
    #[error("City not found: {0}")]
    CityNotFound(String),

    /// Identity operation failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Transport-level failure (unreachable host, non-2xx status)
    #[error("Network error: {0}")]
    Network(String),

    /// A response did not match the expected schema
    #[error("Decode error: {0}")]
    Decode(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is worth a manual retry
    ///
    /// Nothing is retried automatically; this only informs presentation.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApplicationError::Network(_) | ApplicationError::RateLimited
        )
    }

    /// Human-readable message for presentation at the point of failure
    pub fn user_message(&self) -> String {
        match self {
            ApplicationError::Auth(e) => e.user_message().to_string(),
            ApplicationError::Unauthenticated => "Please sign in first.".to_string(),
            ApplicationError::InvalidReference => {
                "Your favorites are unavailable right now.".to_string()
            },
            ApplicationError::CityNotFound(city) => {
                format!("\"{city}\" is not a known city.")
            },
            ApplicationError::Network(_) => {
                "Network error. Please check your connection.".to_string()
            },
            ApplicationError::RateLimited => {
                "Too many requests. Please try again later.".to_string()
            },
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_errors_are_retryable() {
        assert!(ApplicationError::Network("timeout".into()).is_retryable());
        assert!(ApplicationError::RateLimited.is_retryable());
    }

    #[test]
    fn decode_errors_are_not_retryable() {
        assert!(!ApplicationError::Decode("bad schema".into()).is_retryable());
        assert!(!ApplicationError::Unauthenticated.is_retryable());
    }

    #[test]
    fn city_not_found_message_names_the_city() {
        let msg = ApplicationError::CityNotFound("Atlantis".into()).user_message();
        assert!(msg.contains("Atlantis"));
    }

    #[test]
    fn auth_errors_use_their_own_message() {
        let msg = ApplicationError::Auth(AuthError::WrongPassword).user_message();
        assert_eq!(msg, "Incorrect password. Please try again.");
    }

    #[test]
    fn unknown_failures_fall_back_to_generic_message() {
        let msg = ApplicationError::Internal("boom".into()).user_message();
        assert_eq!(msg, "Something went wrong. Please try again.");
    }
}
