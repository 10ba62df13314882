//! Weather adapter - implements `WeatherPort` using `integration_weather`

use application::error::ApplicationError;
use application::ports::{
    CurrentConditions, DailyOutlook, HourlyOutlook, WeatherPort, WeatherSnapshot,
};
use async_trait::async_trait;
use domain::{DomainError, GeoLocation, TemperatureUnit};
use integration_weather::{
    CurrentData, DailyData, ForecastResponse, HourlyData, OpenMeteoClient, WeatherConfig,
    WeatherError,
};
use tracing::{debug, instrument};

/// Adapter for weather retrieval via the Open-Meteo API
#[derive(Debug, Clone)]
pub struct WeatherAdapter {
    client: OpenMeteoClient,
}

impl WeatherAdapter {
    /// Create a new adapter with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new() -> Result<Self, ApplicationError> {
        Self::with_config(WeatherConfig::default())
    }

    /// Create with custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn with_config(config: WeatherConfig) -> Result<Self, ApplicationError> {
        let client =
            OpenMeteoClient::new(config).map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self { client })
    }

    /// Map integration weather errors to application errors
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::ConnectionFailed(e)
            | WeatherError::RequestFailed(e)
            | WeatherError::ServiceUnavailable(e) => ApplicationError::Network(e),
            WeatherError::ParseError(e) => ApplicationError::Decode(e),
            WeatherError::InvalidCoordinates => {
                ApplicationError::Domain(DomainError::InvalidCoordinates)
            },
            WeatherError::RateLimitExceeded => ApplicationError::RateLimited,
        }
    }

    /// Map the raw response into the application snapshot
    fn map_snapshot(response: ForecastResponse) -> WeatherSnapshot {
        WeatherSnapshot {
            current: Self::map_current(response.current),
            daily: response.daily.map(Self::map_daily),
            hourly: response.hourly.map(Self::map_hourly),
        }
    }

    fn map_current(current: CurrentData) -> CurrentConditions {
        CurrentConditions {
            temperature: current.temperature,
            weather_code: current.weather_code,
            humidity: current.humidity,
            wind_speed: current.wind_speed,
            time: current.time,
        }
    }

    fn map_daily(daily: DailyData) -> DailyOutlook {
        DailyOutlook {
            time: daily.time,
            temperature_max: daily.temperature_max,
            temperature_min: daily.temperature_min,
            weather_code: daily.weather_code,
        }
    }

    fn map_hourly(hourly: HourlyData) -> HourlyOutlook {
        HourlyOutlook {
            time: hourly.time,
            temperature: hourly.temperature,
            weather_code: hourly.weather_code,
        }
    }
}

#[async_trait]
impl WeatherPort for WeatherAdapter {
    #[instrument(skip(self), fields(lat = location.latitude(), lon = location.longitude()))]
    async fn fetch(
        &self,
        location: &GeoLocation,
        unit: TemperatureUnit,
    ) -> Result<WeatherSnapshot, ApplicationError> {
        let result = self
            .client
            .fetch_forecast(location.latitude(), location.longitude(), unit)
            .await
            .map_err(Self::map_error);

        match &result {
            Ok(response) => {
                debug!(
                    temperature = response.current.temperature,
                    has_daily = response.daily.is_some(),
                    has_hourly = response.hourly.is_some(),
                    "Retrieved weather"
                );
            },
            Err(e) => {
                debug!(error = %e, "Weather fetch failed");
            },
        }

        result.map(Self::map_snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creates_adapter() {
        assert!(WeatherAdapter::new().is_ok());
    }

    #[test]
    fn map_error_network_variants() {
        for err in [
            WeatherError::ConnectionFailed("refused".into()),
            WeatherError::RequestFailed("HTTP 404".into()),
            WeatherError::ServiceUnavailable("HTTP 503".into()),
        ] {
            assert!(matches!(
                WeatherAdapter::map_error(err),
                ApplicationError::Network(_)
            ));
        }
    }

    #[test]
    fn map_error_parse_becomes_decode() {
        let err = WeatherAdapter::map_error(WeatherError::ParseError("bad field".into()));
        assert!(matches!(err, ApplicationError::Decode(_)));
    }

    #[test]
    fn map_error_rate_limited() {
        let err = WeatherAdapter::map_error(WeatherError::RateLimitExceeded);
        assert!(matches!(err, ApplicationError::RateLimited));
    }

    #[test]
    fn map_error_invalid_coordinates() {
        let err = WeatherAdapter::map_error(WeatherError::InvalidCoordinates);
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::InvalidCoordinates)
        ));
    }

    #[test]
    fn map_snapshot_preserves_optional_blocks() {
        let response = ForecastResponse {
            latitude: 43.25,
            longitude: 76.9,
            current: CurrentData {
                time: "2026-08-06T12:00".into(),
                temperature: 31.4,
                humidity: 28,
                weather_code: 0,
                wind_speed: 9.7,
            },
            daily: None,
            hourly: Some(HourlyData {
                time: vec!["2026-08-06T12:00".into()],
                temperature: vec![31.4],
                weather_code: vec![0],
            }),
        };

        let snapshot = WeatherAdapter::map_snapshot(response);
        assert!(snapshot.daily.is_none());
        assert_eq!(snapshot.hourly.unwrap().len(), 1);
        assert!((snapshot.current.temperature - 31.4).abs() < f64::EPSILON);
    }

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WeatherAdapter>();
    }
}
