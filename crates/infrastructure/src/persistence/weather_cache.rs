//! SQLite weather cache implementation
//!
//! Implements the single-slot `WeatherCachePort`: the serialized payload
//! lives under `weather.last`, its timestamp under `weather.fetched_at`.
//! Every store overwrites both; validity stays derived from the timestamp.

use std::sync::Arc;

use application::{
    error::ApplicationError,
    ports::{CachedWeather, WeatherCachePort, WeatherSnapshot},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task;
use tracing::{debug, instrument, warn};

use super::connection::ConnectionPool;
use super::kv;

/// Key holding the serialized `(city, snapshot)` payload
const PAYLOAD_KEY: &str = "weather.last";

/// Key holding the fetch timestamp, stored separately
const TIMESTAMP_KEY: &str = "weather.fetched_at";

/// What goes into the payload slot; the timestamp is not part of it
#[derive(Debug, Serialize, Deserialize)]
struct SlotPayload {
    city: String,
    snapshot: WeatherSnapshot,
}

/// SQLite-backed single-slot weather cache
#[derive(Debug, Clone)]
pub struct SqliteWeatherCache {
    pool: Arc<ConnectionPool>,
}

impl SqliteWeatherCache {
    /// Create a new cache over the given pool
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WeatherCachePort for SqliteWeatherCache {
    #[instrument(skip(self, snapshot), fields(city = %city))]
    async fn store(
        &self,
        city: &str,
        snapshot: &WeatherSnapshot,
    ) -> Result<(), ApplicationError> {
        let payload = serde_json::to_string(&SlotPayload {
            city: city.to_string(),
            snapshot: snapshot.clone(),
        })
        .map_err(|e| ApplicationError::Internal(e.to_string()))?;
        let fetched_at = Utc::now().to_rfc3339();

        let pool = Arc::clone(&self.pool);
        task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            // Both keys move together or not at all.
            let tx = conn
                .transaction()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;
            kv::set(&tx, PAYLOAD_KEY, &payload)
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;
            kv::set(&tx, TIMESTAMP_KEY, &fetched_at)
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;
            tx.commit()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!("Weather cache slot overwritten");
            Ok(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self))]
    async fn load(&self) -> Result<Option<CachedWeather>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let raw = task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let payload = kv::get(&conn, PAYLOAD_KEY)
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;
            let fetched_at = kv::get(&conn, TIMESTAMP_KEY)
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;
            Ok::<_, ApplicationError>(payload.zip(fetched_at))
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))??;

        let Some((payload, fetched_at)) = raw else {
            debug!("Weather cache slot is empty");
            return Ok(None);
        };

        // A corrupt slot is treated as empty; the next fetch overwrites it.
        let payload: SlotPayload = match serde_json::from_str(&payload) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Discarding corrupt weather cache payload");
                return Ok(None);
            },
        };
        let fetched_at = match DateTime::parse_from_rfc3339(&fetched_at) {
            Ok(ts) => ts.with_timezone(&Utc),
            Err(e) => {
                warn!(error = %e, "Discarding weather cache with corrupt timestamp");
                return Ok(None);
            },
        };

        Ok(Some(CachedWeather {
            city: payload.city,
            snapshot: payload.snapshot,
            fetched_at,
        }))
    }
}
