//! Geoboard Domain Library
//!
//! Core domain types and interfaces for the Geoboard location-tagged
//! message board.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (Sender, Location, Message, StoredMessage)
//!   - `value_objects/`: Immutable value types (MessageRepositoryKind, LifeCycle)
//!   - `services/`: Pure domain logic (great-circle distance)
//!   - `errors/`: Repository error taxonomy
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: The `MessageRepository` capability contract
//!   - `services/`: Clock and id generation
//!
//! # Usage
//!
//! ```rust,ignore
//! use geoboard::{Location, Message, MessageRepository};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    haversine_distance, LifeCycle, Location, Message, MessageRepositoryKind, RepositoryError,
    Sender, StoredMessage, EARTH_RADIUS_METERS,
};
pub use ports::{Clock, IdGenerator, MessageRepository, SystemClock, UuidGenerator};
