//! Open-Meteo weather client
//!
//! HTTP client for the Open-Meteo Weather API.

use std::time::Duration;

use domain::TemperatureUnit;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::ForecastResponse;

/// Current-conditions fields requested on every fetch
const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m";

/// Daily-forecast fields requested on every fetch
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min";

/// Hourly-forecast fields requested on every fetch
const HOURLY_FIELDS: &str = "temperature_2m,weather_code";

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid coordinates provided
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Weather service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Open-Meteo API base URL (default: <https://api.open-meteo.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Connection timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    30
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Open-Meteo HTTP client
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    config: WeatherConfig,
}

impl OpenMeteoClient {
    /// Create a new Open-Meteo client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, WeatherError> {
        Self::new(WeatherConfig::default())
    }

    /// Validate coordinates
    fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), WeatherError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherError::InvalidCoordinates);
        }
        Ok(())
    }

    /// Build the forecast URL with the fixed field lists
    ///
    /// The unit-override parameter is appended only when the requested unit
    /// differs from the API default.
    fn build_forecast_url(&self, latitude: f64, longitude: f64, unit: TemperatureUnit) -> String {
        let mut url = format!(
            "{}/forecast?latitude={latitude}&longitude={longitude}\
             &current={CURRENT_FIELDS}&daily={DAILY_FIELDS}&hourly={HOURLY_FIELDS}\
             &timezone=auto",
            self.config.base_url,
        );
        if let Some(override_value) = unit.query_override() {
            url.push_str("&temperature_unit=");
            url.push_str(override_value);
        }
        url
    }

    /// Fetch current conditions plus daily and hourly forecasts
    ///
    /// Exactly one request; failures propagate immediately to the caller.
    ///
    /// # Errors
    ///
    /// `InvalidCoordinates` before any request; `RequestFailed` /
    /// `ServiceUnavailable` / `RateLimitExceeded` on transport or status
    /// failures; `ParseError` on schema mismatch.
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude, unit = %unit))]
    pub async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        unit: TemperatureUnit,
    ) -> Result<ForecastResponse, WeatherError> {
        Self::validate_coordinates(latitude, longitude)?;

        let url = self.build_forecast_url(latitude, longitude, unit);
        debug!(url = %url, "Fetching weather forecast");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WeatherError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(WeatherError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(WeatherError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(WeatherError::RequestFailed(format!("HTTP {status}")));
        }

        let forecast: ForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::ParseError(e.to_string()))?;

        if let Some(daily) = &forecast.daily {
            daily.validate().map_err(WeatherError::ParseError)?;
        }
        if let Some(hourly) = &forecast.hourly {
            hourly.validate().map_err(WeatherError::ParseError)?;
        }

        Ok(forecast)
    }
}
