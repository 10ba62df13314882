//! Firebase Auth client
//!
//! HTTP client for the identitytoolkit REST API: `accounts:signUp` (with an
//! empty body for anonymous accounts) and `accounts:signInWithPassword`.
//! The API reports failures as an error object whose `message` carries a
//! stable code string; `AuthApiError` mirrors those codes.

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, instrument};

/// Auth API errors
#[derive(Debug, Error)]
pub enum AuthApiError {
    /// Connection to the auth service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the auth service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse a response from the auth service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// No account exists for this email (`EMAIL_NOT_FOUND`)
    #[error("email not found")]
    EmailNotFound,

    /// Credentials rejected (`INVALID_PASSWORD`, `INVALID_LOGIN_CREDENTIALS`)
    #[error("invalid credentials")]
    InvalidPassword,

    /// Email already registered (`EMAIL_EXISTS`)
    #[error("email already exists")]
    EmailExists,

    /// Account disabled by an administrator (`USER_DISABLED`)
    #[error("user disabled")]
    UserDisabled,

    /// Request throttled (`TOO_MANY_ATTEMPTS_TRY_LATER`)
    #[error("too many attempts")]
    TooManyAttempts,

    /// Sign-in method disabled for the project (`OPERATION_NOT_ALLOWED`)
    #[error("operation not allowed")]
    OperationNotAllowed,

    /// Email rejected by the service (`INVALID_EMAIL`)
    #[error("invalid email")]
    InvalidEmail,

    /// Password rejected by the service (`WEAK_PASSWORD`)
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Any code outside the known set
    #[error("auth api error: {0}")]
    Api(String),
}

/// Auth service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Identitytoolkit base URL
    /// (default: <https://identitytoolkit.googleapis.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Web API key for the Firebase project
    pub api_key: SecretString,

    /// Connection timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    30
}

/// A successful sign-in/sign-up response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// The provider-issued uid
    pub local_id: String,
    /// Bearer token for database access
    pub id_token: SecretString,
    /// Email, absent for anonymous accounts
    #[serde(default)]
    pub email: Option<String>,
    /// Token lifetime in seconds, as a string
    #[serde(default)]
    pub expires_in: Option<String>,
}

/// Error envelope the auth API returns on non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Firebase Auth HTTP client
#[derive(Debug, Clone)]
pub struct FirebaseAuthClient {
    client: Client,
    config: AuthConfig,
}

impl FirebaseAuthClient {
    /// Create a new auth client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: AuthConfig) -> Result<Self, AuthApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AuthApiError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create and sign in an anonymous account
    #[instrument(skip(self))]
    pub async fn sign_up_anonymous(&self) -> Result<SessionResponse, AuthApiError> {
        self.post_account("signUp", json!({ "returnSecureToken": true }))
            .await
    }

    /// Create an email/password account
    #[instrument(skip_all)]
    pub async fn sign_up_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionResponse, AuthApiError> {
        self.post_account(
            "signUp",
            json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }),
        )
        .await
    }

    /// Sign in with email and password
    #[instrument(skip_all)]
    pub async fn sign_in_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionResponse, AuthApiError> {
        self.post_account(
            "signInWithPassword",
            json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }),
        )
        .await
    }

    /// POST to an `accounts:` endpoint; one request, no retry
    async fn post_account(
        &self,
        endpoint: &str,
        body: serde_json::Value,
    ) -> Result<SessionResponse, AuthApiError> {
        // The key stays out of logs; only the endpoint is recorded.
        debug!(endpoint, "Calling auth endpoint");
        let url = format!(
            "{}/accounts:{endpoint}?key={}",
            self.config.base_url,
            self.config.api_key.expose_secret()
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthApiError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<SessionResponse>()
                .await
                .map_err(|e| AuthApiError::ParseError(e.to_string()));
        }

        let envelope = response
            .json::<ErrorEnvelope>()
            .await
            .map_err(|_| AuthApiError::RequestFailed(format!("HTTP {status}")))?;
        Err(map_error_code(&envelope.error.message))
    }
}

/// Map an auth API error message to a typed error
///
/// Messages are either a bare code (`EMAIL_NOT_FOUND`) or a code with an
/// explanation (`WEAK_PASSWORD : Password should be at least 6 characters`);
/// the code is the first token.
fn map_error_code(message: &str) -> AuthApiError {
    let code = message
        .split([' ', ':'])
        .next()
        .unwrap_or_default()
        .trim();

    match code {
        "EMAIL_NOT_FOUND" => AuthApiError::EmailNotFound,
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => AuthApiError::InvalidPassword,
        "EMAIL_EXISTS" => AuthApiError::EmailExists,
        "USER_DISABLED" => AuthApiError::UserDisabled,
        "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthApiError::TooManyAttempts,
        "OPERATION_NOT_ALLOWED" => AuthApiError::OperationNotAllowed,
        "INVALID_EMAIL" => AuthApiError::InvalidEmail,
        "WEAK_PASSWORD" => AuthApiError::WeakPassword(message.to_string()),
        _ => AuthApiError::Api(message.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            base_url: default_base_url(),
            api_key: SecretString::from("test-key"),
            timeout_secs: 5,
        }
    }

    #[test]
    fn client_creation() {
        assert!(FirebaseAuthClient::new(config()).is_ok());
    }

    #[test]
    fn config_defaults_apply() {
        let parsed: AuthConfig = serde_json::from_value(serde_json::json!({
            "api_key": "abc"
        }))
        .unwrap();
        assert_eq!(parsed.base_url, "https://identitytoolkit.googleapis.com/v1");
        assert_eq!(parsed.timeout_secs, 30);
    }

    #[test]
    fn bare_codes_map_to_typed_errors() {
        assert!(matches!(
            map_error_code("EMAIL_NOT_FOUND"),
            AuthApiError::EmailNotFound
        ));
        assert!(matches!(
            map_error_code("INVALID_PASSWORD"),
            AuthApiError::InvalidPassword
        ));
        assert!(matches!(
            map_error_code("INVALID_LOGIN_CREDENTIALS"),
            AuthApiError::InvalidPassword
        ));
        assert!(matches!(
            map_error_code("EMAIL_EXISTS"),
            AuthApiError::EmailExists
        ));
        assert!(matches!(
            map_error_code("USER_DISABLED"),
            AuthApiError::UserDisabled
        ));
        assert!(matches!(
            map_error_code("TOO_MANY_ATTEMPTS_TRY_LATER"),
            AuthApiError::TooManyAttempts
        ));
        assert!(matches!(
            map_error_code("OPERATION_NOT_ALLOWED"),
            AuthApiError::OperationNotAllowed
        ));
        assert!(matches!(
            map_error_code("INVALID_EMAIL"),
            AuthApiError::InvalidEmail
        ));
    }

    #[test]
    fn weak_password_keeps_the_explanation() {
        let err = map_error_code("WEAK_PASSWORD : Password should be at least 6 characters");
        match err {
            AuthApiError::WeakPassword(message) => {
                assert!(message.contains("at least 6 characters"));
            },
            other => unreachable!("Expected WeakPassword, got {other:?}"),
        }
    }

    #[test]
    fn unknown_codes_fall_back_to_api_error() {
        assert!(matches!(
            map_error_code("SOMETHING_NEW"),
            AuthApiError::Api(_)
        ));
    }

    #[test]
    fn session_response_decodes_without_email() {
        let response: SessionResponse = serde_json::from_value(serde_json::json!({
            "localId": "anon-uid-1",
            "idToken": "token-abc",
            "refreshToken": "refresh-abc",
            "expiresIn": "3600"
        }))
        .unwrap();
        assert_eq!(response.local_id, "anon-uid-1");
        assert!(response.email.is_none());
        assert_eq!(response.expires_in.as_deref(), Some("3600"));
    }
}
