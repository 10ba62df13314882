//! Favorites repository port
//!
//! Defines the interface to the per-user remote favorites collection,
//! including the live subscription that redelivers the full set on every
//! remote change.

use async_trait::async_trait;
use domain::{FavoriteCity, FavoriteId, UserId};
#[cfg(test)]
use mockall::automock;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::error::ApplicationError;

/// A live feed of favorites snapshots
///
/// Every delivery is the *entire* current set for the subscribed user, not
/// a diff; records that failed to decode have already been skipped. The
/// feed owns its producer: dropping it aborts the producing task.
#[derive(Debug)]
pub struct FavoritesFeed {
    receiver: mpsc::Receiver<Vec<FavoriteCity>>,
    _producer: Option<ProducerGuard>,
}

impl FavoritesFeed {
    /// Feed over a bare channel (tests, in-memory implementations)
    #[must_use]
    pub const fn new(receiver: mpsc::Receiver<Vec<FavoriteCity>>) -> Self {
        Self {
            receiver,
            _producer: None,
        }
    }

    /// Feed whose producer task is aborted when the feed is dropped
    #[must_use]
    pub const fn with_producer(
        receiver: mpsc::Receiver<Vec<FavoriteCity>>,
        producer: AbortHandle,
    ) -> Self {
        Self {
            receiver,
            _producer: Some(ProducerGuard(producer)),
        }
    }

    /// Receive the next full snapshot; `None` when the feed has ended
    pub async fn recv(&mut self) -> Option<Vec<FavoriteCity>> {
        self.receiver.recv().await
    }
}

/// Aborts the producing task when dropped
#[derive(Debug)]
struct ProducerGuard(AbortHandle);

impl Drop for ProducerGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Port for the remote favorites collection
///
/// All operations are scoped to one user's collection; implementations map
/// the user to its `users/{userId}/favorites` path.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FavoritesRepository: Send + Sync {
    /// Write a full favorite record, keyed by its id
    async fn put(&self, user: &UserId, favorite: &FavoriteCity) -> Result<(), ApplicationError>;

    /// Partially update a record: the note field only
    async fn update_note<'a>(
        &self,
        user: &UserId,
        id: &FavoriteId,
        note: Option<&'a str>,
    ) -> Result<(), ApplicationError>;

    /// Delete a record
    async fn remove(&self, user: &UserId, id: &FavoriteId) -> Result<(), ApplicationError>;

    /// Fetch the full current set once
    async fn fetch_all(&self, user: &UserId) -> Result<Vec<FavoriteCity>, ApplicationError>;

    /// Open a live subscription delivering the full set on every change
    ///
    /// The first delivery is the current set at subscription time.
    async fn subscribe(&self, user: &UserId) -> Result<FavoritesFeed, ApplicationError>;
}
