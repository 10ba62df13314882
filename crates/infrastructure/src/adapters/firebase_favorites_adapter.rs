//! Firebase favorites adapter - implements `FavoritesRepository`
//!
//! CRUD passes straight through to the Realtime Database REST surface. The
//! subscription rides the change feed: one full decoded snapshot on open,
//! then a re-fetch and redelivery of the full set on every `put`/`patch`
//! event. The current auth token is attached to every request.

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{AuthTokenProvider, FavoritesFeed, FavoritesRepository};
use async_trait::async_trait;
use domain::{FavoriteCity, FavoriteId, UserId};
use futures::StreamExt;
use integration_firebase::{DatabaseConfig, DatabaseError, RealtimeDbClient, StreamEvent};
use secrecy::ExposeSecret;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};

/// Adapter for the per-user favorites collection
pub struct FirebaseFavoritesAdapter {
    client: RealtimeDbClient,
    tokens: Arc<dyn AuthTokenProvider>,
}

impl std::fmt::Debug for FirebaseFavoritesAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseFavoritesAdapter")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl FirebaseFavoritesAdapter {
    /// Create a new adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(
        config: DatabaseConfig,
        tokens: Arc<dyn AuthTokenProvider>,
    ) -> Result<Self, ApplicationError> {
        let client =
            RealtimeDbClient::new(config).map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self { client, tokens })
    }

    fn token(&self) -> Option<String> {
        self.tokens
            .current_token()
            .map(|token| token.expose_secret().to_string())
    }

    fn map_error(err: DatabaseError) -> ApplicationError {
        match err {
            DatabaseError::ConnectionFailed(e) | DatabaseError::RequestFailed(e) => {
                ApplicationError::Network(e)
            },
            DatabaseError::PermissionDenied => ApplicationError::InvalidReference,
            DatabaseError::ParseError(e) => ApplicationError::Decode(e),
        }
    }
}

#[async_trait]
impl FavoritesRepository for FirebaseFavoritesAdapter {
    #[instrument(skip(self, favorite), fields(user = %user, id = %favorite.id()))]
    async fn put(&self, user: &UserId, favorite: &FavoriteCity) -> Result<(), ApplicationError> {
        self.client
            .put_favorite(user.as_str(), favorite, self.token().as_deref())
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self, note), fields(user = %user, id = %id))]
    async fn update_note<'a>(
        &self,
        user: &UserId,
        id: &FavoriteId,
        note: Option<&'a str>,
    ) -> Result<(), ApplicationError> {
        // PATCH with null clears the field; omitting it would leave the old
        // note in place.
        let fields = json!({ "note": note });
        self.client
            .patch_favorite(user.as_str(), id.as_str(), &fields, self.token().as_deref())
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self), fields(user = %user, id = %id))]
    async fn remove(&self, user: &UserId, id: &FavoriteId) -> Result<(), ApplicationError> {
        self.client
            .delete_favorite(user.as_str(), id.as_str(), self.token().as_deref())
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self), fields(user = %user))]
    async fn fetch_all(&self, user: &UserId) -> Result<Vec<FavoriteCity>, ApplicationError> {
        self.client
            .fetch_favorites(user.as_str(), self.token().as_deref())
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self), fields(user = %user))]
    async fn subscribe(&self, user: &UserId) -> Result<FavoritesFeed, ApplicationError> {
        let mut events = self
            .client
            .stream_changes(user.as_str(), self.token().as_deref())
            .await
            .map_err(Self::map_error)?;

        let (tx, rx) = mpsc::channel(8);
        let client = self.client.clone();
        let tokens = Arc::clone(&self.tokens);
        let uid = user.as_str().to_string();

        let producer = tokio::spawn(async move {
            // First delivery: the set as it stands at subscription time.
            if !deliver_snapshot(&client, &uid, tokens.as_ref(), &tx).await {
                return;
            }

            while let Some(event) = events.next().await {
                match event {
                    StreamEvent::Put | StreamEvent::Patch => {
                        if !deliver_snapshot(&client, &uid, tokens.as_ref(), &tx).await {
                            break;
                        }
                    },
                    StreamEvent::KeepAlive => {},
                    StreamEvent::Cancel | StreamEvent::AuthRevoked => {
                        warn!(event = ?event, "Change feed closed by the server");
                        break;
                    },
                }
            }
            debug!("Favorites change feed ended");
        });

        Ok(FavoritesFeed::with_producer(rx, producer.abort_handle()))
    }
}

/// Fetch the full set and push it into the feed
///
/// Returns `false` when the feed's consumer is gone. A failed fetch is
/// logged and skipped; the next change event tries again.
async fn deliver_snapshot(
    client: &RealtimeDbClient,
    uid: &str,
    tokens: &dyn AuthTokenProvider,
    tx: &mpsc::Sender<Vec<FavoriteCity>>,
) -> bool {
    let token = tokens
        .current_token()
        .map(|token| token.expose_secret().to_string());

    match client.fetch_favorites(uid, token.as_deref()).await {
        Ok(favorites) => tx.send(favorites).await.is_ok(),
        Err(e) => {
            warn!(error = %e, "Failed to fetch favorites after a change event");
            !tx.is_closed()
        },
    }
}
