//! Application Layer (Use Cases)
//!
//! Calls the message repository on behalf of the HTTP layer.

mod message_service;

pub use message_service::{LocationQuery, MessageService, DEFAULT_LIMIT, DEFAULT_RADIUS_METERS};
