//! Domain Entities
//!
//! - Location: Geographic coordinate in degrees
//! - Sender: Author identity attached to a message
//! - Message: Unstored submission
//! - StoredMessage: Message accepted by a repository

mod location;
mod message;

pub use location::*;
pub use message::*;
