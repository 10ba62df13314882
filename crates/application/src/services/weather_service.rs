//! Weather service
//!
//! Orchestrates a weather request: resolve the city name through the
//! directory, fetch through the weather port with the persisted unit
//! preference, overwrite the single cache slot on success, and fall back to
//! the last valid cached snapshot — flagged stale — when the fetch fails.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use domain::{CityDirectory, TemperatureUnit};
use tracing::{debug, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{CachedWeather, PreferenceStorePort, WeatherCachePort, WeatherPort, WeatherSnapshot},
};

/// Whether a report carries live or cached data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Fetched just now
    Fresh,
    /// Served from the cache after a failed fetch; offline data
    Stale {
        /// When the cached snapshot was originally fetched
        fetched_at: DateTime<Utc>,
    },
}

/// A weather result for presentation
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    /// City the snapshot belongs to
    pub city: String,
    /// The snapshot
    pub snapshot: WeatherSnapshot,
    /// Live or cached
    pub freshness: Freshness,
}

impl WeatherReport {
    /// Whether the report should be presented as stale/offline data
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self.freshness, Freshness::Stale { .. })
    }
}

/// Service orchestrating weather fetches, caching, and the unit preference
pub struct WeatherService {
    weather: Arc<dyn WeatherPort>,
    cache: Arc<dyn WeatherCachePort>,
    preferences: Arc<dyn PreferenceStorePort>,
    directory: CityDirectory,
}

impl fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherService")
            .field("directory_len", &self.directory.len())
            .finish_non_exhaustive()
    }
}

impl WeatherService {
    /// Create a new weather service
    #[must_use]
    pub fn new(
        weather: Arc<dyn WeatherPort>,
        cache: Arc<dyn WeatherCachePort>,
        preferences: Arc<dyn PreferenceStorePort>,
        directory: CityDirectory,
    ) -> Self {
        Self {
            weather,
            cache,
            preferences,
            directory,
        }
    }

    /// The city directory used for resolution
    #[must_use]
    pub const fn directory(&self) -> &CityDirectory {
        &self.directory
    }

    /// Suggest city names for a partial input
    #[must_use]
    pub fn suggestions(&self, input: &str) -> Vec<&str> {
        self.directory.suggest(input)
    }

    /// The persisted unit preference, defaulting to Celsius
    pub async fn temperature_unit(&self) -> TemperatureUnit {
        match self.preferences.temperature_unit().await {
            Ok(unit) => unit.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Failed to read unit preference; defaulting");
                TemperatureUnit::default()
            },
        }
    }

    /// Persist the unit preference
    pub async fn set_temperature_unit(&self, unit: TemperatureUnit) -> Result<(), ApplicationError> {
        self.preferences.set_temperature_unit(unit).await
    }

    /// Fetch weather for a city by name
    ///
    /// Resolution happens first: an unknown name fails with `CityNotFound`
    /// before any request is made. A successful fetch overwrites the cache
    /// slot; a failed fetch falls back to the cached snapshot when one is
    /// still valid, flagged stale. With no valid cache the fetch error
    /// propagates unchanged — nothing is retried.
    #[instrument(skip(self), fields(city = %name))]
    pub async fn fetch_for_city(&self, name: &str) -> Result<WeatherReport, ApplicationError> {
        let name = name.trim();
        let location = self
            .directory
            .resolve(name)
            .ok_or_else(|| ApplicationError::CityNotFound(name.to_string()))?;
        let unit = self.temperature_unit().await;

        match self.weather.fetch(&location, unit).await {
            Ok(snapshot) => {
                if let Err(e) = self.cache.store(name, &snapshot).await {
                    warn!(error = %e, "Failed to persist the weather cache slot");
                }
                Ok(WeatherReport {
                    city: name.to_string(),
                    snapshot,
                    freshness: Freshness::Fresh,
                })
            },
            Err(fetch_err) => {
                warn!(error = %fetch_err, "Weather fetch failed; checking cache");
                match self.valid_cached().await {
                    Some(cached) => {
                        debug!(city = %cached.city, "Serving cached weather as offline fallback");
                        Ok(stale_report(cached))
                    },
                    None => Err(fetch_err),
                }
            },
        }
    }

    /// The last cached snapshot, if still valid; for startup display
    pub async fn last_cached(&self) -> Option<WeatherReport> {
        self.valid_cached().await.map(stale_report)
    }

    async fn valid_cached(&self) -> Option<CachedWeather> {
        match self.cache.load().await {
            Ok(cached) => cached.filter(CachedWeather::is_valid),
            Err(e) => {
                warn!(error = %e, "Failed to load the weather cache slot");
                None
            },
        }
    }
}

fn stale_report(cached: CachedWeather) -> WeatherReport {
    WeatherReport {
        city: cached.city,
        snapshot: cached.snapshot,
        freshness: Freshness::Stale {
            fetched_at: cached.fetched_at,
        },
    }
}
