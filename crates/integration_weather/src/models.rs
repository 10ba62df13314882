//! Weather wire models
//!
//! Raw response types mirroring the Open-Meteo JSON schema for the fields
//! this application requests. Forecast blocks are parallel arrays; lengths
//! must agree index-for-index, which `validate` checks after decode.

use serde::Deserialize;

/// Raw current-conditions block
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentData {
    /// Observation time (local ISO 8601)
    pub time: String,
    /// Temperature in the requested unit
    #[serde(rename = "temperature_2m")]
    pub temperature: f64,
    /// Relative humidity percentage
    #[serde(rename = "relative_humidity_2m")]
    pub humidity: u8,
    /// WMO weather code
    pub weather_code: u8,
    /// Wind speed in km/h
    #[serde(rename = "wind_speed_10m")]
    pub wind_speed: f64,
}

/// Raw daily-forecast block (parallel arrays)
#[derive(Debug, Clone, Deserialize)]
pub struct DailyData {
    /// Forecast dates
    pub time: Vec<String>,
    /// Daily dominant WMO weather code
    pub weather_code: Vec<u8>,
    /// Daily maximum temperature
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Vec<f64>,
    /// Daily minimum temperature
    #[serde(rename = "temperature_2m_min")]
    pub temperature_min: Vec<f64>,
}

impl DailyData {
    /// Check that the parallel arrays are index-aligned
    pub(crate) fn validate(&self) -> Result<(), String> {
        let len = self.time.len();
        if self.weather_code.len() == len
            && self.temperature_max.len() == len
            && self.temperature_min.len() == len
        {
            Ok(())
        } else {
            Err(format!(
                "daily arrays are not index-aligned: time={}, weather_code={}, max={}, min={}",
                len,
                self.weather_code.len(),
                self.temperature_max.len(),
                self.temperature_min.len()
            ))
        }
    }
}

/// Raw hourly-forecast block (parallel arrays)
#[derive(Debug, Clone, Deserialize)]
pub struct HourlyData {
    /// Forecast hours
    pub time: Vec<String>,
    /// Hourly temperature
    #[serde(rename = "temperature_2m")]
    pub temperature: Vec<f64>,
    /// Hourly WMO weather code
    pub weather_code: Vec<u8>,
}

impl HourlyData {
    /// Check that the parallel arrays are index-aligned
    pub(crate) fn validate(&self) -> Result<(), String> {
        let len = self.time.len();
        if self.temperature.len() == len && self.weather_code.len() == len {
            Ok(())
        } else {
            Err(format!(
                "hourly arrays are not index-aligned: time={}, temperature={}, weather_code={}",
                len,
                self.temperature.len(),
                self.weather_code.len()
            ))
        }
    }
}

/// Raw forecast response
///
/// `daily` and `hourly` stay optional: a response without them is valid.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub current: CurrentData,
    #[serde(default)]
    pub daily: Option<DailyData>,
    #[serde(default)]
    pub hourly: Option<HourlyData>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_response_decodes() {
        let json = serde_json::json!({
            "latitude": 43.25,
            "longitude": 76.9,
            "current": {
                "time": "2026-08-06T12:00",
                "temperature_2m": 31.4,
                "relative_humidity_2m": 28,
                "weather_code": 0,
                "wind_speed_10m": 9.7
            },
            "daily": {
                "time": ["2026-08-06", "2026-08-07"],
                "weather_code": [0, 3],
                "temperature_2m_max": [33.1, 30.0],
                "temperature_2m_min": [19.5, 18.0]
            },
            "hourly": {
                "time": ["2026-08-06T12:00"],
                "temperature_2m": [31.4],
                "weather_code": [0]
            }
        });

        let response: ForecastResponse = serde_json::from_value(json).unwrap();
        assert!((response.current.temperature - 31.4).abs() < f64::EPSILON);
        assert_eq!(response.current.humidity, 28);
        let daily = response.daily.unwrap();
        assert!(daily.validate().is_ok());
        assert_eq!(daily.time.len(), 2);
        assert!(response.hourly.unwrap().validate().is_ok());
    }

    #[test]
    fn response_without_forecast_blocks_decodes() {
        let json = serde_json::json!({
            "latitude": 51.5,
            "longitude": -0.12,
            "current": {
                "time": "2026-08-06T10:00",
                "temperature_2m": 21.0,
                "relative_humidity_2m": 60,
                "weather_code": 2,
                "wind_speed_10m": 14.2
            }
        });

        let response: ForecastResponse = serde_json::from_value(json).unwrap();
        assert!(response.daily.is_none());
        assert!(response.hourly.is_none());
    }

    #[test]
    fn response_without_current_fails_to_decode() {
        let json = serde_json::json!({
            "latitude": 51.5,
            "longitude": -0.12
        });
        assert!(serde_json::from_value::<ForecastResponse>(json).is_err());
    }

    #[test]
    fn misaligned_daily_arrays_fail_validation() {
        let daily = DailyData {
            time: vec!["2026-08-06".into(), "2026-08-07".into()],
            weather_code: vec![0],
            temperature_max: vec![33.1, 30.0],
            temperature_min: vec![19.5, 18.0],
        };
        assert!(daily.validate().is_err());
    }

    #[test]
    fn misaligned_hourly_arrays_fail_validation() {
        let hourly = HourlyData {
            time: vec!["2026-08-06T12:00".into()],
            temperature: vec![31.4, 30.1],
            weather_code: vec![0],
        };
        assert!(hourly.validate().is_err());
    }
}
