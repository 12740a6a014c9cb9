//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the domain layer
//! interacts with storage and the outside world.
//!
//! Implementations of the repository trait live in the server's adapters.

pub mod repositories;
pub mod services;

// Re-exports
pub use repositories::*;
pub use services::*;
