//! Identity provider port
//!
//! Defines the interface to the backing authentication service together
//! with the failure taxonomy surfaced to users.

use async_trait::async_trait;
use domain::{EmailAddress, UserId};
#[cfg(test)]
use mockall::automock;
use secrecy::SecretString;
use thiserror::Error;

/// Identity failures, each with a distinct user-facing message
///
/// Local pre-flight validation produces the first four variants; the rest
/// come back from the backing service, which remains the source of truth
/// and may reject requests that passed local validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Email does not match a `local@domain.tld` shape
    #[error("invalid email address")]
    InvalidEmail,

    /// Sign-in attempted with an empty password
    #[error("password required")]
    EmptyPassword,

    /// Sign-up password shorter than six characters
    #[error("password too short")]
    WeakPassword,

    /// Sign-up confirmation field does not match the password
    #[error("password confirmation does not match")]
    PasswordMismatch,

    /// Credentials rejected
    #[error("wrong password")]
    WrongPassword,

    /// No account for this email
    #[error("user not found")]
    UserNotFound,

    /// Sign-up with an already-registered email
    #[error("email already in use")]
    EmailAlreadyInUse,

    /// Transport failure reaching the identity service
    #[error("network failure")]
    Network,

    /// Too many attempts
    #[error("rate limited")]
    RateLimited,

    /// The account exists but is disabled
    #[error("account disabled")]
    AccountDisabled,

    /// Anything the taxonomy does not recognize
    #[error("auth service error: {0}")]
    Service(String),
}

impl AuthError {
    /// The message shown to the user for this failure
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "Please enter a valid email address.",
            Self::EmptyPassword => "Please enter your password.",
            Self::WeakPassword => "Password must be at least 6 characters.",
            Self::PasswordMismatch => "Passwords do not match.",
            Self::WrongPassword => "Incorrect password. Please try again.",
            Self::UserNotFound => "No account found with this email. Please sign up.",
            Self::EmailAlreadyInUse => "This email is already registered. Please sign in.",
            Self::Network => "Network error. Please check your connection.",
            Self::RateLimited => "Too many attempts. Please try again later.",
            Self::AccountDisabled => "This account has been disabled.",
            Self::Service(_) => "Sign in failed. Please try again.",
        }
    }
}

/// An authenticated session returned by the identity service
#[derive(Clone)]
pub struct AuthSession {
    /// Provider-issued uid
    pub user_id: UserId,
    /// Email for password accounts, `None` for anonymous ones
    pub email: Option<EmailAddress>,
    /// Bearer token for per-user database access
    pub id_token: SecretString,
    /// Whether the session belongs to an anonymous account
    pub is_anonymous: bool,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("id_token", &"<redacted>")
            .field("is_anonymous", &self.is_anonymous)
            .finish()
    }
}

/// Port for the backing authentication service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Create and sign in an anonymous account
    async fn sign_in_anonymously(&self) -> Result<AuthSession, AuthError>;

    /// Sign in with email and password
    async fn sign_in(&self, email: &EmailAddress, password: &str)
    -> Result<AuthSession, AuthError>;

    /// Create an account with email and password
    async fn sign_up(&self, email: &EmailAddress, password: &str)
    -> Result<AuthSession, AuthError>;
}

/// Read-only view of the current identity, consumed by adapters that need
/// to attach user context (e.g. the database auth token) to requests
pub trait AuthTokenProvider: Send + Sync {
    /// Current user id, if signed in
    fn current_user_id(&self) -> Option<UserId>;

    /// Current bearer token, if signed in
    fn current_token(&self) -> Option<SecretString>;
}
