//! Realtime Database client
//!
//! JSON REST client for the per-user favorites collection at
//! `users/{uid}/favorites/{id}.json`, plus the event-stream endpoint the
//! live subscription rides on. Requests carry the caller's auth token as
//! the `auth` query parameter when one is supplied.

use std::{collections::BTreeMap, time::Duration};

use domain::FavoriteCity;
use reqwest::{Client, header};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::streaming::{ChangeStream, create_change_stream};

/// Realtime Database errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Connection to the database failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the database failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The database rejected the credentials (HTTP 401/403)
    #[error("permission denied")]
    PermissionDenied,

    /// Failed to parse a response from the database
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Realtime Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database base URL, e.g. `https://<project>.firebasedatabase.app`
    pub base_url: String,

    /// Connection timeout in seconds for plain requests (default: 30)
    ///
    /// The streaming connection is exempt; it stays open indefinitely.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

const fn default_timeout() -> u64 {
    30
}

/// Realtime Database HTTP client
#[derive(Debug, Clone)]
pub struct RealtimeDbClient {
    client: Client,
    stream_client: Client,
    config: DatabaseConfig,
}

impl RealtimeDbClient {
    /// Create a new database client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be initialized.
    pub fn new(config: DatabaseConfig) -> Result<Self, DatabaseError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        // No overall timeout: the change feed is a long-lived connection.
        let stream_client = Client::builder()
            .build()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            stream_client,
            config,
        })
    }

    /// URL of the whole favorites collection or of one record
    fn favorites_url(&self, uid: &str, id: Option<&str>, auth: Option<&str>) -> String {
        let mut url = match id {
            Some(id) => format!(
                "{}/users/{uid}/favorites/{id}.json",
                self.config.base_url
            ),
            None => format!("{}/users/{uid}/favorites.json", self.config.base_url),
        };
        if let Some(token) = auth {
            url.push_str("?auth=");
            url.push_str(token);
        }
        url
    }

    /// Write a full favorite record, keyed by its id
    #[instrument(skip(self, favorite, auth), fields(id = %favorite.id()))]
    pub async fn put_favorite(
        &self,
        uid: &str,
        favorite: &FavoriteCity,
        auth: Option<&str>,
    ) -> Result<(), DatabaseError> {
        let url = self.favorites_url(uid, Some(favorite.id().as_str()), auth);
        let response = self
            .client
            .put(&url)
            .json(favorite)
            .send()
            .await
            .map_err(|e| DatabaseError::RequestFailed(e.to_string()))?;
        check_status(response.status())
    }

    /// Partially update a record with the given fields
    #[instrument(skip(self, fields, auth))]
    pub async fn patch_favorite(
        &self,
        uid: &str,
        id: &str,
        fields: &serde_json::Value,
        auth: Option<&str>,
    ) -> Result<(), DatabaseError> {
        let url = self.favorites_url(uid, Some(id), auth);
        let response = self
            .client
            .patch(&url)
            .json(fields)
            .send()
            .await
            .map_err(|e| DatabaseError::RequestFailed(e.to_string()))?;
        check_status(response.status())
    }

    /// Delete a record
    #[instrument(skip(self, auth))]
    pub async fn delete_favorite(
        &self,
        uid: &str,
        id: &str,
        auth: Option<&str>,
    ) -> Result<(), DatabaseError> {
        let url = self.favorites_url(uid, Some(id), auth);
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| DatabaseError::RequestFailed(e.to_string()))?;
        check_status(response.status())
    }

    /// Fetch the whole favorites set for a user
    ///
    /// The collection comes back as an `{id: record}` object, or JSON
    /// `null` when empty. Records that fail to decode are skipped and
    /// logged, never fatal to the set.
    #[instrument(skip(self, auth))]
    pub async fn fetch_favorites(
        &self,
        uid: &str,
        auth: Option<&str>,
    ) -> Result<Vec<FavoriteCity>, DatabaseError> {
        let url = self.favorites_url(uid, None, auth);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DatabaseError::RequestFailed(e.to_string()))?;
        check_status(response.status())?;

        let collection: Option<BTreeMap<String, serde_json::Value>> = response
            .json()
            .await
            .map_err(|e| DatabaseError::ParseError(e.to_string()))?;

        let records = collection.unwrap_or_default();
        let total = records.len();
        let favorites: Vec<FavoriteCity> = records
            .into_values()
            .filter_map(|value| match FavoriteCity::from_record(value) {
                Ok(favorite) => Some(favorite),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed favorite record");
                    None
                },
            })
            .collect();

        debug!(total, decoded = favorites.len(), "Fetched favorites");
        Ok(favorites)
    }

    /// Open the change feed for a user's favorites
    ///
    /// Yields one event per remote change until the server closes the
    /// connection or the stream is dropped.
    #[instrument(skip(self, auth))]
    pub async fn stream_changes(
        &self,
        uid: &str,
        auth: Option<&str>,
    ) -> Result<ChangeStream, DatabaseError> {
        let url = self.favorites_url(uid, None, auth);
        let response = self
            .stream_client
            .get(&url)
            .header(header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(|e| DatabaseError::RequestFailed(e.to_string()))?;
        check_status(response.status())?;

        debug!("Change feed opened");
        Ok(create_change_stream(response))
    }
}

fn check_status(status: reqwest::StatusCode) -> Result<(), DatabaseError> {
    if status.is_success() {
        return Ok(());
    }
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(DatabaseError::PermissionDenied);
    }
    Err(DatabaseError::RequestFailed(format!("HTTP {status}")))
}
