//! Value objects - immutable domain primitives with validation

mod email_address;
mod favorite_id;
mod geo_location;
mod temperature_unit;
mod user_id;

pub use email_address::EmailAddress;
pub use favorite_id::FavoriteId;
pub use geo_location::GeoLocation;
pub use temperature_unit::TemperatureUnit;
pub use user_id::UserId;
