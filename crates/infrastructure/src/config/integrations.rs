//! Integration configurations: weather API and Firebase.

use secrecy::SecretString;
use serde::Deserialize;

// ==============================
// Weather Configuration
// ==============================

/// Weather service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    /// Open-Meteo API base URL
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    30
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl WeatherConfig {
    /// Convert to the integration crate's client configuration
    #[must_use]
    pub fn to_client_config(&self) -> integration_weather::WeatherConfig {
        integration_weather::WeatherConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

// ==============================
// Firebase Configuration
// ==============================

/// Firebase Auth and Realtime Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseConfig {
    /// Identitytoolkit base URL
    #[serde(default = "default_auth_base_url")]
    pub auth_base_url: String,

    /// Web API key for the Firebase project
    pub api_key: SecretString,

    /// Realtime Database base URL,
    /// e.g. `https://<project>.firebasedatabase.app`
    pub database_url: String,

    /// Connection timeout in seconds for both services
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_auth_base_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".to_string()
}

impl FirebaseConfig {
    /// Convert to the integration crate's auth client configuration
    #[must_use]
    pub fn to_auth_config(&self) -> integration_firebase::AuthConfig {
        integration_firebase::AuthConfig {
            base_url: self.auth_base_url.clone(),
            api_key: self.api_key.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    /// Convert to the integration crate's database client configuration
    #[must_use]
    pub fn to_database_config(&self) -> integration_firebase::DatabaseConfig {
        integration_firebase::DatabaseConfig {
            base_url: self.database_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}
