//! Persistence - SQLite-backed local state
//!
//! One small key-value table (`app_state`) backs both the single-slot
//! weather cache and the user preference keys.

mod connection;
mod migrations;
mod preference_store;
mod weather_cache;

pub use connection::{ConnectionPool, DatabaseError, PooledConn, create_pool};
pub use preference_store::SqlitePreferenceStore;
pub use weather_cache::SqliteWeatherCache;

pub(crate) use connection::kv;
