//! Open-Meteo weather integration
//!
//! Client for the Open-Meteo Weather API (<https://open-meteo.com>).
//! One GET per fetch, no API key, no retry; decodes the fixed response
//! schema the application requests.

pub mod client;
mod models;

pub use client::{OpenMeteoClient, WeatherConfig, WeatherError};
pub use models::{CurrentData, DailyData, ForecastResponse, HourlyData};
