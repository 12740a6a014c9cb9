//! Geoboard HTTP Models
//!
//! Request/response DTOs for the message endpoints.

mod message;

pub use message::*;
