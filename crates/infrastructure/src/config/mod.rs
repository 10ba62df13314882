//! Application configuration
//!
//! Split into focused sub-modules:
//! - `database`: SQLite database settings
//! - `integrations`: Weather API and Firebase settings
//!
//! Loaded from defaults, then an optional `config.toml`, then `SKYLIGHT_*`
//! environment overrides.

mod database;
mod integrations;

use serde::Deserialize;

pub use database::DatabaseConfig;
pub use integrations::{FirebaseConfig, WeatherConfig};

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// SQLite database settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Weather API settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Firebase Auth and Realtime Database settings
    pub firebase: FirebaseConfig,
}

impl AppConfig {
    /// Load configuration from defaults, `config.toml`, and environment
    ///
    /// Environment variables use the `SKYLIGHT_` prefix with `_` as the
    /// section separator, e.g. `SKYLIGHT_DATABASE_PATH`.
    ///
    /// # Errors
    ///
    /// Returns an error when a source fails to parse or a required field
    /// (the Firebase section) is missing.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("SKYLIGHT")
                    .separator("_")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let parsed: AppConfig = toml::from_str(
            r#"
            [firebase]
            api_key = "abc"
            database_url = "https://skylight.firebasedatabase.app"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.database.path, "skylight.db");
        assert_eq!(parsed.database.max_connections, 5);
        assert!(parsed.database.run_migrations);
        assert_eq!(parsed.weather.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(
            parsed.firebase.auth_base_url,
            "https://identitytoolkit.googleapis.com/v1"
        );
    }

    #[test]
    fn missing_firebase_section_is_an_error() {
        let parsed = toml::from_str::<AppConfig>("[database]\npath = \"x.db\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let parsed: AppConfig = toml::from_str(
            r#"
            [database]
            path = "/var/lib/skylight/state.db"
            max_connections = 2

            [weather]
            base_url = "https://weather.example.com/v1"
            timeout_secs = 10

            [firebase]
            api_key = "abc"
            database_url = "https://skylight.firebasedatabase.app"
            timeout_secs = 12
            "#,
        )
        .unwrap();

        assert_eq!(parsed.database.path, "/var/lib/skylight/state.db");
        assert_eq!(parsed.database.max_connections, 2);
        assert_eq!(parsed.weather.timeout_secs, 10);
        assert_eq!(parsed.firebase.timeout_secs, 12);
    }
}
