//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these
//! ports.

mod auth_port;
mod favorites_repository;
mod preference_store;
mod weather_cache;
mod weather_port;

#[cfg(test)]
pub use auth_port::MockAuthPort;
pub use auth_port::{AuthError, AuthPort, AuthSession, AuthTokenProvider};
#[cfg(test)]
pub use favorites_repository::MockFavoritesRepository;
pub use favorites_repository::{FavoritesFeed, FavoritesRepository};
#[cfg(test)]
pub use preference_store::MockPreferenceStorePort;
pub use preference_store::PreferenceStorePort;
#[cfg(test)]
pub use weather_cache::MockWeatherCachePort;
pub use weather_cache::{CACHE_TTL, CachedWeather, WeatherCachePort};
#[cfg(test)]
pub use weather_port::MockWeatherPort;
pub use weather_port::{
    CurrentConditions, DailyOutlook, HourlyOutlook, WeatherCondition, WeatherPort, WeatherSnapshot,
};
