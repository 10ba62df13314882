//! Local weather cache port
//!
//! A single-slot cache holding the most recent successful fetch, for
//! offline fallback. One entry, overwritten on every store; validity is
//! derived from the stored timestamp, never stored itself.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;
use crate::ports::weather_port::WeatherSnapshot;

/// Fixed cache validity window, not configurable
pub const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// The single cached entry: last fetched snapshot plus its fetch time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedWeather {
    /// City the snapshot was fetched for
    pub city: String,
    /// The snapshot itself
    pub snapshot: WeatherSnapshot,
    /// When the snapshot was stored
    pub fetched_at: DateTime<Utc>,
}

impl CachedWeather {
    /// Whether the entry is still valid at `now`
    ///
    /// Valid iff strictly less than [`CACHE_TTL`] has elapsed since storage.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match (now - self.fetched_at).to_std() {
            Ok(elapsed) => elapsed < CACHE_TTL,
            // fetched_at in the future (clock adjustment): nothing elapsed
            Err(_) => true,
        }
    }

    /// Whether the entry is still valid right now
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

/// Port for the single-slot weather cache
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherCachePort: Send + Sync {
    /// Unconditionally overwrite the slot with `(city, snapshot, now)`
    async fn store(&self, city: &str, snapshot: &WeatherSnapshot)
    -> Result<(), ApplicationError>;

    /// Load the slot, `None` when nothing has been stored yet
    async fn load(&self) -> Result<Option<CachedWeather>, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::ports::weather_port::CurrentConditions;

    fn entry(fetched_at: DateTime<Utc>) -> CachedWeather {
        CachedWeather {
            city: "Almaty".into(),
            snapshot: WeatherSnapshot {
                current: CurrentConditions {
                    temperature: 25.0,
                    weather_code: 0,
                    humidity: 30,
                    wind_speed: 5.0,
                    time: "2026-08-06T12:00".into(),
                },
                daily: None,
                hourly: None,
            },
            fetched_at,
        }
    }

    fn _assert_object_safe(_: &dyn WeatherCachePort) {}

    #[test]
    fn fresh_entry_is_valid() {
        let now = Utc::now();
        assert!(entry(now).is_valid_at(now));
    }

    #[test]
    fn entry_just_under_ttl_is_valid() {
        let now = Utc::now();
        let stored = now - TimeDelta::seconds(3599);
        assert!(entry(stored).is_valid_at(now));
    }

    #[test]
    fn entry_at_exactly_ttl_is_invalid() {
        let now = Utc::now();
        let stored = now - TimeDelta::seconds(3600);
        assert!(!entry(stored).is_valid_at(now));
    }

    #[test]
    fn entry_past_ttl_is_invalid() {
        let now = Utc::now();
        let stored = now - TimeDelta::hours(2);
        assert!(!entry(stored).is_valid_at(now));
    }

    #[test]
    fn future_timestamp_counts_as_valid() {
        let now = Utc::now();
        let stored = now + TimeDelta::seconds(30);
        assert!(entry(stored).is_valid_at(now));
    }

    #[test]
    fn cached_entry_round_trips_through_json() {
        let cached = entry(Utc::now());
        let json = serde_json::to_string(&cached).unwrap();
        let parsed: CachedWeather = serde_json::from_str(&json).unwrap();
        assert_eq!(cached, parsed);
    }
}
