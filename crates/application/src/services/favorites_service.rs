//! Favorites service
//!
//! The per-user favorites list with live synchronization: optimistic add,
//! note update, delete, case-insensitive lookup, and a single replaceable
//! subscription that swaps the in-memory list wholesale on every delivery.
//! The list is always kept sorted newest-first.

use std::{fmt, sync::Arc};

use domain::{FavoriteCity, FavoriteId, GeoLocation};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::FavoritesRepository,
    services::IdentityService,
};

/// Service managing the favorites list and its subscription
pub struct FavoritesService {
    repository: Arc<dyn FavoritesRepository>,
    identity: Arc<IdentityService>,
    list_tx: watch::Sender<Vec<FavoriteCity>>,
    sync_task: Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for FavoritesService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FavoritesService")
            .field("favorites", &self.list_tx.borrow().len())
            .field("sync_active", &self.sync_active())
            .finish_non_exhaustive()
    }
}

impl FavoritesService {
    /// Create a new favorites service with an empty list and no subscription
    #[must_use]
    pub fn new(repository: Arc<dyn FavoritesRepository>, identity: Arc<IdentityService>) -> Self {
        let (list_tx, _) = watch::channel(Vec::new());
        Self {
            repository,
            identity,
            list_tx,
            sync_task: Mutex::new(None),
        }
    }

    /// Snapshot of the current in-memory list, newest first
    #[must_use]
    pub fn favorites(&self) -> Vec<FavoriteCity> {
        self.list_tx.borrow().clone()
    }

    /// Observe list replacements; consumers re-render on change
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Vec<FavoriteCity>> {
        self.list_tx.subscribe()
    }

    /// Whether a subscription task is currently installed
    #[must_use]
    pub fn sync_active(&self) -> bool {
        self.sync_task
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Case-insensitive membership check against the in-memory list
    #[must_use]
    pub fn is_favorite(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Case-insensitive lookup in the in-memory list
    #[must_use]
    pub fn find(&self, name: &str) -> Option<FavoriteCity> {
        self.list_tx
            .borrow()
            .iter()
            .find(|f| f.matches_name(name))
            .cloned()
    }

    /// Open the live subscription for the current user
    ///
    /// No-ops silently when nobody is signed in. Calling again while active
    /// replaces the previous subscription (the old task is aborted first)
    /// rather than stacking listeners.
    #[instrument(skip(self))]
    pub async fn start_sync(self: &Arc<Self>) -> Result<(), ApplicationError> {
        let Some(user) = self.identity.current_user_id() else {
            debug!("start_sync without a signed-in user; ignoring");
            return Ok(());
        };

        // Release the previous handle before acquiring the next one.
        self.stop_sync();

        let mut feed = self.repository.subscribe(&user).await?;
        info!(user_id = %user, "Favorites subscription opened");

        // The task holds a weak reference so dropping the service tears the
        // subscription down instead of keeping it alive through the task.
        let weak = Arc::downgrade(self);
        let task = tokio::spawn(async move {
            while let Some(snapshot) = feed.recv().await {
                let Some(service) = weak.upgrade() else { break };
                debug!(count = snapshot.len(), "Favorites snapshot received");
                service.replace_all(snapshot);
            }
            debug!("Favorites feed ended");
        });

        if let Some(previous) = self.sync_task.lock().replace(task) {
            previous.abort();
        }
        Ok(())
    }

    /// Cancel the active subscription, if any; safe to call when idle
    #[instrument(skip(self))]
    pub fn stop_sync(&self) {
        if let Some(task) = self.sync_task.lock().take() {
            task.abort();
            debug!("Favorites subscription stopped");
        }
    }

    /// Watch identity transitions and keep the subscription in step:
    /// sign-in (or user switch) starts sync, sign-out stops it
    ///
    /// Returns the watcher task; abort it at teardown.
    #[must_use]
    pub fn watch_identity(self: &Arc<Self>) -> JoinHandle<()> {
        let mut rx = self.identity.subscribe();
        let weak = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut current = rx.borrow().clone();
            while rx.changed().await.is_ok() {
                let next = rx.borrow_and_update().clone();
                if next == current {
                    continue;
                }
                current.clone_from(&next);

                let Some(service) = weak.upgrade() else { break };
                if next.is_some() {
                    if let Err(e) = service.start_sync().await {
                        warn!(error = %e, "Failed to start favorites sync after sign-in");
                    }
                } else {
                    service.stop_sync();
                }
            }
        })
    }

    /// Add a favorite for the current user
    ///
    /// Writes the full record remotely, then optimistically appends it to
    /// the in-memory list so callers see it before the subscription
    /// round-trips. A duplicate-id guard keeps a racing subscription
    /// delivery of the same record from double-inserting.
    #[instrument(skip(self, note, location), fields(city = %name))]
    pub async fn add(
        &self,
        name: &str,
        note: Option<&str>,
        location: GeoLocation,
    ) -> Result<FavoriteCity, ApplicationError> {
        let user = self
            .identity
            .current_user_id()
            .ok_or(ApplicationError::Unauthenticated)?;

        let favorite = FavoriteCity::new(name, note, user.clone(), location);
        self.repository.put(&user, &favorite).await?;
        info!(id = %favorite.id(), "Favorite added");

        let inserted = favorite.clone();
        self.list_tx.send_modify(|list| {
            if !list.iter().any(|f| f.id() == inserted.id()) {
                list.push(inserted);
                sort_newest_first(list);
            }
        });

        Ok(favorite)
    }

    /// Update only the note of an existing favorite
    ///
    /// The local list is refreshed by the subscription, not optimistically.
    #[instrument(skip(self, note), fields(id = %id))]
    pub async fn update_note(
        &self,
        id: &FavoriteId,
        note: Option<&str>,
    ) -> Result<(), ApplicationError> {
        let user = self
            .identity
            .current_user_id()
            .ok_or(ApplicationError::InvalidReference)?;

        self.repository.update_note(&user, id, note).await?;
        debug!("Favorite note updated");
        Ok(())
    }

    /// Delete a favorite
    ///
    /// The local list shrinks when the subscription redelivers the set.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: &FavoriteId) -> Result<(), ApplicationError> {
        let user = self
            .identity
            .current_user_id()
            .ok_or(ApplicationError::InvalidReference)?;

        self.repository.remove(&user, id).await?;
        info!("Favorite deleted");
        Ok(())
    }

    /// Replace the in-memory list wholesale with a delivered snapshot
    fn replace_all(&self, mut snapshot: Vec<FavoriteCity>) {
        sort_newest_first(&mut snapshot);
        self.list_tx.send_replace(snapshot);
    }
}

impl Drop for FavoritesService {
    fn drop(&mut self) {
        self.stop_sync();
    }
}

/// Sort by creation time descending; stable, so equal timestamps keep
/// their delivery order
fn sort_newest_first(list: &mut [FavoriteCity]) {
    list.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
}
