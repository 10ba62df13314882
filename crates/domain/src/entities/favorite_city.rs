//! Favorite city entity
//!
//! A user-saved city with an optional free-text note. The serde
//! representation is the remote record format: `cityName` for the name and
//! `createdAt` as numeric epoch seconds (fractional values accepted, since
//! existing records carry sub-second precision).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{FavoriteId, GeoLocation, UserId};

/// A favorite city owned by the user identified by `created_by`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteCity {
    id: FavoriteId,
    #[serde(rename = "cityName")]
    name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    note: Option<String>,
    #[serde(rename = "createdAt", with = "epoch_seconds")]
    created_at: DateTime<Utc>,
    #[serde(rename = "createdBy")]
    created_by: UserId,
    #[serde(flatten)]
    location: GeoLocation,
}

impl FavoriteCity {
    /// Create a new favorite: generates the id and stamps the creation time
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        note: Option<&str>,
        created_by: UserId,
        location: GeoLocation,
    ) -> Self {
        Self {
            id: FavoriteId::generate(),
            name: name.into(),
            note: normalize_note(note),
            created_at: Utc::now(),
            created_by,
            location,
        }
    }

    /// Restore a favorite with all fields known (storage, tests)
    #[must_use]
    pub const fn restore(
        id: FavoriteId,
        name: String,
        note: Option<String>,
        created_at: DateTime<Utc>,
        created_by: UserId,
        location: GeoLocation,
    ) -> Self {
        Self {
            id,
            name,
            note,
            created_at,
            created_by,
            location,
        }
    }

    /// Decode a remote record, validating the schema
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRecord` when a required field is missing
    /// or malformed, or when the coordinates are out of range. Callers that
    /// process sets of remote records skip invalid ones rather than failing
    /// the whole set.
    pub fn from_record(value: serde_json::Value) -> Result<Self, DomainError> {
        let favorite: Self = serde_json::from_value(value)
            .map_err(|e| DomainError::InvalidRecord(e.to_string()))?;

        if favorite.id.as_str().trim().is_empty() {
            return Err(DomainError::InvalidRecord("empty id".to_string()));
        }
        if favorite.name.trim().is_empty() {
            return Err(DomainError::InvalidRecord("empty cityName".to_string()));
        }
        // Location was deserialized without range checks; re-validate.
        GeoLocation::new(favorite.location.latitude(), favorite.location.longitude())
            .map_err(|_| DomainError::InvalidRecord("coordinates out of range".to_string()))?;

        Ok(favorite)
    }

    /// Get the record id
    #[must_use]
    pub const fn id(&self) -> &FavoriteId {
        &self.id
    }

    /// Get the city name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the note, if any
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Get the creation timestamp
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Get the owning user
    #[must_use]
    pub const fn created_by(&self) -> &UserId {
        &self.created_by
    }

    /// Get the city coordinates, fixed at creation
    #[must_use]
    pub const fn location(&self) -> GeoLocation {
        self.location
    }

    /// Case-insensitive name comparison
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

fn normalize_note(note: Option<&str>) -> Option<String> {
    note.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(ToString::to_string)
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let note = Option::<String>::deserialize(deserializer)?;
    Ok(note.filter(|n| !n.trim().is_empty()))
}

/// Numeric epoch-seconds codec for `createdAt`
mod epoch_seconds {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    #[allow(clippy::cast_precision_loss)] // sub-microsecond drift is irrelevant here
    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(dt.timestamp_micros() as f64 / 1_000_000.0)
    }

    #[allow(clippy::cast_possible_truncation)] // range-checked before the cast
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = f64::deserialize(deserializer)?;
        let micros = seconds * 1_000_000.0;
        if !micros.is_finite() || micros < i64::MIN as f64 || micros > i64::MAX as f64 {
            return Err(D::Error::custom(format!(
                "createdAt out of range: {seconds}"
            )));
        }
        DateTime::<Utc>::from_timestamp_micros(micros.round() as i64)
            .ok_or_else(|| D::Error::custom(format!("createdAt out of range: {seconds}")))
    }
}
