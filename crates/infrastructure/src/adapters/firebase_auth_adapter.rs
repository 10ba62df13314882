//! Firebase auth adapter - implements `AuthPort` using `integration_firebase`

use application::ports::{AuthError, AuthPort, AuthSession};
use async_trait::async_trait;
use domain::{EmailAddress, UserId};
use integration_firebase::{AuthApiError, AuthConfig, FirebaseAuthClient, SessionResponse};
use tracing::{debug, instrument};

/// Adapter for the Firebase Auth REST API
#[derive(Debug, Clone)]
pub struct FirebaseAuthAdapter {
    client: FirebaseAuthClient,
}

impl FirebaseAuthAdapter {
    /// Create a new adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        let client =
            FirebaseAuthClient::new(config).map_err(|e| AuthError::Service(e.to_string()))?;
        Ok(Self { client })
    }

    /// Map auth API errors to the application failure taxonomy
    fn map_error(err: AuthApiError) -> AuthError {
        match err {
            AuthApiError::EmailNotFound => AuthError::UserNotFound,
            AuthApiError::InvalidPassword => AuthError::WrongPassword,
            AuthApiError::EmailExists => AuthError::EmailAlreadyInUse,
            AuthApiError::UserDisabled => AuthError::AccountDisabled,
            AuthApiError::TooManyAttempts => AuthError::RateLimited,
            AuthApiError::InvalidEmail => AuthError::InvalidEmail,
            AuthApiError::WeakPassword(_) => AuthError::WeakPassword,
            AuthApiError::ConnectionFailed(_) | AuthApiError::RequestFailed(_) => {
                AuthError::Network
            },
            AuthApiError::ParseError(e) => AuthError::Service(e),
            AuthApiError::OperationNotAllowed => {
                AuthError::Service("operation not allowed".to_string())
            },
            AuthApiError::Api(e) => AuthError::Service(e),
        }
    }

    /// Build an application session from a service response
    fn map_session(response: SessionResponse, is_anonymous: bool) -> Result<AuthSession, AuthError> {
        let user_id = UserId::new(response.local_id)
            .map_err(|e| AuthError::Service(format!("invalid uid in response: {e}")))?;
        // A malformed email in the response is dropped, not fatal.
        let email = response
            .email
            .and_then(|raw| EmailAddress::new(raw).ok());

        Ok(AuthSession {
            user_id,
            email,
            id_token: response.id_token,
            is_anonymous,
        })
    }
}

#[async_trait]
impl AuthPort for FirebaseAuthAdapter {
    #[instrument(skip(self))]
    async fn sign_in_anonymously(&self) -> Result<AuthSession, AuthError> {
        let response = self
            .client
            .sign_up_anonymous()
            .await
            .map_err(Self::map_error)?;
        debug!("Anonymous account created");
        Self::map_session(response, true)
    }

    #[instrument(skip_all)]
    async fn sign_in(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let response = self
            .client
            .sign_in_password(email.as_str(), password)
            .await
            .map_err(Self::map_error)?;
        debug!("Password sign-in succeeded");
        Self::map_session(response, false)
    }

    #[instrument(skip_all)]
    async fn sign_up(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let response = self
            .client
            .sign_up_email(email.as_str(), password)
            .await
            .map_err(Self::map_error)?;
        debug!("Account created");
        Self::map_session(response, false)
    }
}
