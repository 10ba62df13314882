//! Identity service
//!
//! Wraps the backing authentication service with local pre-flight
//! validation, session storage, and a change notification that fires on
//! every identity transition (none→user, user→none, user A→user B).

use std::{fmt, sync::Arc};

use domain::{EmailAddress, UserId};
use parking_lot::RwLock;
use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{AuthError, AuthPort, AuthSession, AuthTokenProvider},
};

/// Minimum password length accepted at sign-up
const MIN_PASSWORD_LEN: usize = 6;

/// Service managing the authenticated identity
pub struct IdentityService {
    auth: Arc<dyn AuthPort>,
    session: RwLock<Option<AuthSession>>,
    identity_tx: watch::Sender<Option<UserId>>,
}

impl fmt::Debug for IdentityService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityService")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl IdentityService {
    /// Create a new identity service with no signed-in user
    #[must_use]
    pub fn new(auth: Arc<dyn AuthPort>) -> Self {
        let (identity_tx, _) = watch::channel(None);
        Self {
            auth,
            session: RwLock::new(None),
            identity_tx,
        }
    }

    /// Current user id, if signed in
    #[must_use]
    pub fn current_user_id(&self) -> Option<UserId> {
        self.session.read().as_ref().map(|s| s.user_id.clone())
    }

    /// Current session, if signed in
    #[must_use]
    pub fn current_session(&self) -> Option<AuthSession> {
        self.session.read().clone()
    }

    /// Whether any user is signed in
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_some()
    }

    /// Subscribe to identity transitions
    ///
    /// The receiver observes the current identity immediately and is
    /// notified on every transition; same-identity updates do not fire.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<UserId>> {
        self.identity_tx.subscribe()
    }

    /// Sign in anonymously
    #[instrument(skip(self))]
    pub async fn sign_in_anonymously(&self) -> Result<UserId, ApplicationError> {
        let session = self.auth.sign_in_anonymously().await?;
        info!(user_id = %session.user_id, "Signed in anonymously");
        Ok(self.install(session))
    }

    /// Sign in with email and password
    ///
    /// Validates the email shape and password presence locally before
    /// delegating; the backing service may still reject.
    #[instrument(skip(self, email, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserId, ApplicationError> {
        let email = EmailAddress::new(email).map_err(|_| AuthError::InvalidEmail)?;
        if password.is_empty() {
            return Err(AuthError::EmptyPassword.into());
        }

        let session = self.auth.sign_in(&email, password).await?;
        info!("Signed in with email");
        Ok(self.install(session))
    }

    /// Create an account with email, password, and confirmation
    #[instrument(skip(self, email, password, confirm))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<UserId, ApplicationError> {
        let email = EmailAddress::new(email).map_err(|_| AuthError::InvalidEmail)?;
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword.into());
        }
        if password != confirm {
            return Err(AuthError::PasswordMismatch.into());
        }

        let session = self.auth.sign_up(&email, password).await?;
        info!("Account created");
        Ok(self.install(session))
    }

    /// Sign out: drop the session locally and notify
    ///
    /// Safe to call when nobody is signed in.
    #[instrument(skip(self))]
    pub fn sign_out(&self) {
        let had_session = self.session.write().take().is_some();
        if had_session {
            info!("Signed out");
        } else {
            warn!("Sign-out without a session; ignoring");
        }
        self.set_identity(None);
    }

    fn install(&self, session: AuthSession) -> UserId {
        let user_id = session.user_id.clone();
        *self.session.write() = Some(session);
        self.set_identity(Some(user_id.clone()));
        user_id
    }

    /// Publish the identity, notifying only on actual transitions
    fn set_identity(&self, user: Option<UserId>) {
        self.identity_tx.send_if_modified(|current| {
            if *current == user {
                false
            } else {
                *current = user;
                true
            }
        });
    }
}

impl AuthTokenProvider for IdentityService {
    fn current_user_id(&self) -> Option<UserId> {
        Self::current_user_id(self)
    }

    fn current_token(&self) -> Option<SecretString> {
        self.session.read().as_ref().map(|s| s.id_token.clone())
    }
}
