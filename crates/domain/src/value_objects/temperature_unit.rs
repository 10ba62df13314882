//! Temperature unit preference

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Temperature unit chosen by the user
///
/// Celsius is the default everywhere; Fahrenheit is an explicit opt-in that
/// also changes the weather request (the API defaults to Celsius).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    /// Degrees Celsius (API default)
    #[default]
    Celsius,
    /// Degrees Fahrenheit
    Fahrenheit,
}

impl TemperatureUnit {
    /// Stable string form used for the persisted preference
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Celsius => "celsius",
            Self::Fahrenheit => "fahrenheit",
        }
    }

    /// Query-parameter value for the weather API, `None` when the API
    /// default already matches
    #[must_use]
    pub const fn query_override(&self) -> Option<&'static str> {
        match self {
            Self::Celsius => None,
            Self::Fahrenheit => Some("fahrenheit"),
        }
    }

    /// Display symbol
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TemperatureUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "celsius" => Ok(Self::Celsius),
            "fahrenheit" => Ok(Self::Fahrenheit),
            _ => Err(format!(
                "Invalid temperature unit: {s}. Use 'celsius' or 'fahrenheit'"
            )),
        }
    }
}
