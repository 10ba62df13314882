//! Weather service port
//!
//! Defines the interface for weather retrieval and the snapshot model a
//! successful fetch decodes into. Forecast blocks keep the wire layout:
//! parallel arrays, index-aligned by day or hour.

use async_trait::async_trait;
use domain::{GeoLocation, TemperatureUnit};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Weather condition derived from WMO weather codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    /// Clear sky (WMO 0)
    ClearSky,
    /// Mainly clear (WMO 1)
    MainlyClear,
    /// Partly cloudy (WMO 2)
    PartlyCloudy,
    /// Overcast (WMO 3)
    Overcast,
    /// Fog (WMO 45, 48)
    Fog,
    /// Drizzle, including freezing (WMO 51-57)
    Drizzle,
    /// Rain and rain showers (WMO 61-67, 80-82)
    Rain,
    /// Snow, grains and showers (WMO 71-77, 85, 86)
    Snow,
    /// Thunderstorm (WMO 95, 96, 99)
    Thunderstorm,
    /// Unknown condition
    Unknown,
}

impl WeatherCondition {
    /// Convert a WMO weather code to a condition
    ///
    /// See: <https://open-meteo.com/en/docs> for the WMO code reference
    #[must_use]
    pub const fn from_wmo_code(code: u8) -> Self {
        match code {
            0 => Self::ClearSky,
            1 => Self::MainlyClear,
            2 => Self::PartlyCloudy,
            3 => Self::Overcast,
            45 | 48 => Self::Fog,
            51..=57 => Self::Drizzle,
            61..=67 | 80..=82 => Self::Rain,
            71..=77 | 85 | 86 => Self::Snow,
            95 | 96 | 99 => Self::Thunderstorm,
            _ => Self::Unknown,
        }
    }

    /// Get a human-readable description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::ClearSky => "Clear sky",
            Self::MainlyClear => "Mainly clear",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Overcast => "Overcast",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Thunderstorm => "Thunderstorm",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Current conditions at the requested location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Temperature in the requested unit
    pub temperature: f64,
    /// WMO weather code
    pub weather_code: u8,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Observation time as reported by the API (local ISO 8601)
    pub time: String,
}

impl CurrentConditions {
    /// Condition derived from the weather code
    #[must_use]
    pub const fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_wmo_code(self.weather_code)
    }
}

/// Daily forecast block: parallel arrays, index-aligned by day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyOutlook {
    /// Forecast dates (local ISO 8601)
    pub time: Vec<String>,
    /// Daily maximum temperature
    pub temperature_max: Vec<f64>,
    /// Daily minimum temperature
    pub temperature_min: Vec<f64>,
    /// Daily dominant WMO weather code
    pub weather_code: Vec<u8>,
}

impl DailyOutlook {
    /// Number of forecast days
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the block is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Iterate the parallel arrays day by day
    pub fn days(&self) -> impl Iterator<Item = (&str, f64, f64, WeatherCondition)> {
        self.time
            .iter()
            .zip(&self.temperature_max)
            .zip(&self.temperature_min)
            .zip(&self.weather_code)
            .map(|(((date, &max), &min), &code)| {
                (
                    date.as_str(),
                    max,
                    min,
                    WeatherCondition::from_wmo_code(code),
                )
            })
    }
}

/// Hourly forecast block: parallel arrays, index-aligned by hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyOutlook {
    /// Forecast hours (local ISO 8601)
    pub time: Vec<String>,
    /// Hourly temperature
    pub temperature: Vec<f64>,
    /// Hourly WMO weather code
    pub weather_code: Vec<u8>,
}

impl HourlyOutlook {
    /// Number of forecast hours
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the block is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Iterate the parallel arrays hour by hour
    pub fn hours(&self) -> impl Iterator<Item = (&str, f64, WeatherCondition)> {
        self.time
            .iter()
            .zip(&self.temperature)
            .zip(&self.weather_code)
            .map(|((hour, &temp), &code)| {
                (hour.as_str(), temp, WeatherCondition::from_wmo_code(code))
            })
    }
}

/// A single decoded weather response, immutable once decoded
///
/// A response without `daily` or `hourly` blocks is still a valid snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Current conditions
    pub current: CurrentConditions,
    /// Daily forecast, when requested and present
    pub daily: Option<DailyOutlook>,
    /// Hourly forecast, when requested and present
    pub hourly: Option<HourlyOutlook>,
}

/// Port for weather retrieval
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherPort: Send + Sync {
    /// Fetch current weather and forecasts for a location
    ///
    /// One request, no retry; failures propagate to the caller.
    async fn fetch(
        &self,
        location: &GeoLocation,
        unit: TemperatureUnit,
    ) -> Result<WeatherSnapshot, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn WeatherPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn WeatherPort>();
    }

    #[test]
    fn wmo_code_groups() {
        assert_eq!(WeatherCondition::from_wmo_code(0), WeatherCondition::ClearSky);
        assert_eq!(WeatherCondition::from_wmo_code(2), WeatherCondition::PartlyCloudy);
        assert_eq!(WeatherCondition::from_wmo_code(45), WeatherCondition::Fog);
        assert_eq!(WeatherCondition::from_wmo_code(55), WeatherCondition::Drizzle);
        assert_eq!(WeatherCondition::from_wmo_code(63), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_wmo_code(81), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_wmo_code(75), WeatherCondition::Snow);
        assert_eq!(WeatherCondition::from_wmo_code(99), WeatherCondition::Thunderstorm);
    }

    #[test]
    fn unknown_wmo_code_maps_to_unknown() {
        assert_eq!(WeatherCondition::from_wmo_code(42), WeatherCondition::Unknown);
        assert_eq!(WeatherCondition::from_wmo_code(255), WeatherCondition::Unknown);
    }

    #[test]
    fn daily_outlook_days_zip_in_step() {
        let daily = DailyOutlook {
            time: vec!["2026-08-06".into(), "2026-08-07".into()],
            temperature_max: vec![31.0, 29.5],
            temperature_min: vec![19.0, 18.2],
            weather_code: vec![0, 61],
        };

        let days: Vec<_> = daily.days().collect();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].0, "2026-08-06");
        assert!((days[0].1 - 31.0).abs() < f64::EPSILON);
        assert_eq!(days[1].3, WeatherCondition::Rain);
    }

    #[test]
    fn hourly_outlook_hours_zip_in_step() {
        let hourly = HourlyOutlook {
            time: vec!["2026-08-06T12:00".into()],
            temperature: vec![27.3],
            weather_code: vec![3],
        };

        let hours: Vec<_> = hourly.hours().collect();
        assert_eq!(hours.len(), 1);
        assert_eq!(hours[0].2, WeatherCondition::Overcast);
    }

    #[test]
    fn snapshot_without_forecasts_serializes_round_trip() {
        let snapshot = WeatherSnapshot {
            current: CurrentConditions {
                temperature: 24.0,
                weather_code: 1,
                humidity: 40,
                wind_speed: 8.5,
                time: "2026-08-06T12:00".into(),
            },
            daily: None,
            hourly: None,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: WeatherSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, parsed);
        assert_eq!(parsed.current.condition(), WeatherCondition::MainlyClear);
    }
}
