//! SQLite preference store implementation
//!
//! Holds the user's temperature-unit preference under a single key.

use std::sync::Arc;

use application::{error::ApplicationError, ports::PreferenceStorePort};
use async_trait::async_trait;
use domain::TemperatureUnit;
use tokio::task;
use tracing::{debug, instrument, warn};

use super::connection::ConnectionPool;
use super::kv;

/// Key holding the temperature-unit preference string
const UNIT_KEY: &str = "preferences.temperature_unit";

/// SQLite-backed preference store
#[derive(Debug, Clone)]
pub struct SqlitePreferenceStore {
    pool: Arc<ConnectionPool>,
}

impl SqlitePreferenceStore {
    /// Create a new preference store over the given pool
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PreferenceStorePort for SqlitePreferenceStore {
    #[instrument(skip(self))]
    async fn temperature_unit(&self) -> Result<Option<TemperatureUnit>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let stored = task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;
            kv::get(&conn, UNIT_KEY).map_err(|e| ApplicationError::Internal(e.to_string()))
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))??;

        match stored {
            None => Ok(None),
            Some(value) => match value.parse::<TemperatureUnit>() {
                Ok(unit) => Ok(Some(unit)),
                Err(e) => {
                    warn!(error = %e, "Ignoring unparseable unit preference");
                    Ok(None)
                },
            },
        }
    }

    #[instrument(skip(self))]
    async fn set_temperature_unit(&self, unit: TemperatureUnit) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;
            kv::set(&conn, UNIT_KEY, unit.as_str())
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;
            debug!(unit = %unit, "Unit preference saved");
            Ok(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}
