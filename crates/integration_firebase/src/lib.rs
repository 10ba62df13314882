//! Firebase integration
//!
//! REST clients for the two Firebase surfaces this application uses:
//! the Auth API (identitytoolkit) for anonymous and email/password
//! accounts, and the Realtime Database JSON API for the per-user
//! favorites collection, including its `text/event-stream` change feed.
//! No SDK internals; only the documented HTTP surfaces.

pub mod auth;
pub mod database;
mod streaming;

pub use auth::{AuthApiError, AuthConfig, FirebaseAuthClient, SessionResponse};
pub use database::{DatabaseConfig, DatabaseError, RealtimeDbClient};
pub use streaming::{ChangeStream, SseParser, StreamEvent};
