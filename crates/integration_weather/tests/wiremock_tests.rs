//! Integration tests for the weather client using wiremock
//!
//! These tests verify the client's behavior against a mock HTTP server,
//! ensuring proper handling of the request shape and response scenarios.

use domain::TemperatureUnit;
use integration_weather::{OpenMeteoClient, WeatherConfig, WeatherError};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param, query_param_is_missing},
};

/// Sample Open-Meteo response with all requested blocks
fn sample_forecast_response() -> serde_json::Value {
    serde_json::json!({
        "latitude": 43.25,
        "longitude": 76.9,
        "generationtime_ms": 0.123,
        "utc_offset_seconds": 18000,
        "timezone": "Asia/Almaty",
        "timezone_abbreviation": "+05",
        "elevation": 851.0,
        "current_units": {
            "time": "iso8601",
            "temperature_2m": "°C",
            "relative_humidity_2m": "%",
            "weather_code": "wmo code",
            "wind_speed_10m": "km/h"
        },
        "current": {
            "time": "2026-08-06T12:00",
            "temperature_2m": 31.4,
            "relative_humidity_2m": 28,
            "weather_code": 0,
            "wind_speed_10m": 9.7
        },
        "daily": {
            "time": ["2026-08-06", "2026-08-07", "2026-08-08"],
            "weather_code": [0, 3, 61],
            "temperature_2m_max": [33.1, 30.0, 26.4],
            "temperature_2m_min": [19.5, 18.0, 16.8]
        },
        "hourly": {
            "time": ["2026-08-06T12:00", "2026-08-06T13:00"],
            "temperature_2m": [31.4, 32.0],
            "weather_code": [0, 1]
        }
    })
}

/// Create a test client configured to use the mock server
///
/// # Panics
///
/// Panics if the client cannot be created (should not happen in tests).
fn create_test_client(mock_server: &MockServer) -> OpenMeteoClient {
    let config = WeatherConfig {
        base_url: mock_server.uri(),
        timeout_secs: 5,
    };
    #[allow(clippy::expect_used)]
    OpenMeteoClient::new(config).expect("Failed to create client")
}

/// Setup a mock for the /forecast endpoint with the given response
async fn setup_forecast_mock(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

// ============================================================================
// Success scenarios
// ============================================================================

#[tokio::test]
async fn test_fetch_forecast_success() {
    let mock_server = MockServer::start().await;

    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(sample_forecast_response()),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client
        .fetch_forecast(43.2389, 76.8897, TemperatureUnit::Celsius)
        .await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");

    let forecast = result.unwrap();
    assert!((forecast.current.temperature - 31.4).abs() < 0.1);
    assert_eq!(forecast.current.humidity, 28);
    assert!((forecast.current.wind_speed - 9.7).abs() < 0.1);
    assert_eq!(forecast.daily.unwrap().time.len(), 3);
    assert_eq!(forecast.hourly.unwrap().temperature.len(), 2);
}

#[tokio::test]
async fn test_missing_daily_block_yields_none_without_failing() {
    let mock_server = MockServer::start().await;

    let mut body = sample_forecast_response();
    body.as_object_mut().unwrap().remove("daily");
    setup_forecast_mock(&mock_server, ResponseTemplate::new(200).set_body_json(body)).await;

    let client = create_test_client(&mock_server);
    let forecast = client
        .fetch_forecast(43.2389, 76.8897, TemperatureUnit::Celsius)
        .await
        .unwrap();

    assert!(forecast.daily.is_none());
    assert!(forecast.hourly.is_some());
}

// ============================================================================
// Error handling scenarios
// ============================================================================

#[tokio::test]
async fn test_server_error_returns_service_unavailable() {
    let mock_server = MockServer::start().await;

    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(500).set_body_string("Internal Server Error"),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client
        .fetch_forecast(43.2389, 76.8897, TemperatureUnit::Celsius)
        .await;

    assert!(
        matches!(result, Err(WeatherError::ServiceUnavailable(_))),
        "Expected ServiceUnavailable, got: {result:?}"
    );
}

#[tokio::test]
async fn test_rate_limit_error() {
    let mock_server = MockServer::start().await;

    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(429).set_body_string("Rate limit exceeded"),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client
        .fetch_forecast(43.2389, 76.8897, TemperatureUnit::Celsius)
        .await;

    assert!(
        matches!(result, Err(WeatherError::RateLimitExceeded)),
        "Expected RateLimitExceeded, got: {result:?}"
    );
}

#[tokio::test]
async fn test_client_error_returns_request_failed() {
    let mock_server = MockServer::start().await;

    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(400).set_body_string("Bad Request"),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client
        .fetch_forecast(43.2389, 76.8897, TemperatureUnit::Celsius)
        .await;

    assert!(
        matches!(result, Err(WeatherError::RequestFailed(_))),
        "Expected RequestFailed, got: {result:?}"
    );
}

#[tokio::test]
async fn test_invalid_json_response() {
    let mock_server = MockServer::start().await;

    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_string("not valid json"),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client
        .fetch_forecast(43.2389, 76.8897, TemperatureUnit::Celsius)
        .await;

    assert!(
        matches!(result, Err(WeatherError::ParseError(_))),
        "Expected ParseError, got: {result:?}"
    );
}

#[tokio::test]
async fn test_misaligned_parallel_arrays_fail_decode() {
    let mock_server = MockServer::start().await;

    let mut body = sample_forecast_response();
    // Drop one entry so daily arrays disagree on length.
    body["daily"]["weather_code"] = serde_json::json!([0, 3]);
    setup_forecast_mock(&mock_server, ResponseTemplate::new(200).set_body_json(body)).await;

    let client = create_test_client(&mock_server);
    let result = client
        .fetch_forecast(43.2389, 76.8897, TemperatureUnit::Celsius)
        .await;

    assert!(
        matches!(result, Err(WeatherError::ParseError(_))),
        "Expected ParseError, got: {result:?}"
    );
}

// ============================================================================
// Input validation scenarios
// ============================================================================

#[tokio::test]
async fn test_invalid_coordinates_fail_before_any_request() {
    let mock_server = MockServer::start().await;

    // No mock mounted - validation must fail before a request happens.
    let client = create_test_client(&mock_server);
    let result = client
        .fetch_forecast(91.0, 76.8897, TemperatureUnit::Celsius)
        .await;

    assert!(
        matches!(result, Err(WeatherError::InvalidCoordinates)),
        "Expected InvalidCoordinates, got: {result:?}"
    );
}

// ============================================================================
// Query parameter verification
// ============================================================================

#[tokio::test]
async fn test_request_contains_fixed_query_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("latitude", "43.2389"))
        .and(query_param("longitude", "76.8897"))
        .and(query_param(
            "current",
            "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m",
        ))
        .and(query_param(
            "daily",
            "weather_code,temperature_2m_max,temperature_2m_min",
        ))
        .and(query_param("hourly", "temperature_2m,weather_code"))
        .and(query_param("timezone", "auto"))
        .and(query_param_is_missing("temperature_unit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client
        .fetch_forecast(43.2389, 76.8897, TemperatureUnit::Celsius)
        .await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");
}

#[tokio::test]
async fn test_fahrenheit_adds_unit_override_param() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("temperature_unit", "fahrenheit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client
        .fetch_forecast(40.7128, -74.006, TemperatureUnit::Fahrenheit)
        .await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");
}
