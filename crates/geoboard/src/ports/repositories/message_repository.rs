//! Message Repository Port
//!
//! The capability contract every storage backend satisfies. Callers hold an
//! `Arc<dyn MessageRepository>` chosen once at startup and must observe the
//! same results whichever backend sits behind it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Location, Message, RepositoryError, StoredMessage};

/// Repository interface for location-tagged messages
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Store a message, assigning its id and creation time
    async fn add_message(&self, message: Message) -> Result<StoredMessage, RepositoryError>;

    /// Find a message by exact id.
    ///
    /// Absence is `RepositoryError::NotFound`, never a default value.
    async fn get_message(&self, id: &str) -> Result<StoredMessage, RepositoryError>;

    /// Messages within `radius_meters` of `location`, created strictly after
    /// `after`, at most `limit` of them, ascending by creation time.
    async fn get_messages_for_location(
        &self,
        location: Location,
        radius_meters: f64,
        limit: usize,
        after: DateTime<Utc>,
    ) -> Result<Vec<StoredMessage>, RepositoryError>;
}
