//! User preference storage port
//!
//! A single persisted key holding the chosen temperature unit.

use async_trait::async_trait;
use domain::TemperatureUnit;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for persisted user preferences
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PreferenceStorePort: Send + Sync {
    /// Read the persisted unit preference, `None` when never set
    async fn temperature_unit(&self) -> Result<Option<TemperatureUnit>, ApplicationError>;

    /// Persist the unit preference
    async fn set_temperature_unit(&self, unit: TemperatureUnit) -> Result<(), ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn PreferenceStorePort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn PreferenceStorePort>();
    }
}
