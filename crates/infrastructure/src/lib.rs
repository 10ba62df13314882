//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the Open-Meteo
//! weather adapter, the Firebase auth and favorites adapters, and the
//! SQLite-backed cache and preference stores. Also owns configuration
//! loading and tracing setup.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod telemetry;

pub use adapters::{FirebaseAuthAdapter, FirebaseFavoritesAdapter, WeatherAdapter};
pub use config::{AppConfig, DatabaseConfig, FirebaseConfig, WeatherConfig};
pub use persistence::{
    ConnectionPool, SqlitePreferenceStore, SqliteWeatherCache, create_pool,
};
pub use telemetry::init_telemetry;
