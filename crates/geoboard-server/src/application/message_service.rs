//! Message Application Service (Use Case)
//!
//! Wraps the configured repository with the request deadline. Dropping a
//! repository future on expiry is what cancels an in-flight database call.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};

use geoboard::{Location, Message, MessageRepository, RepositoryError, StoredMessage};

/// Radius used when a query does not give one
pub const DEFAULT_RADIUS_METERS: f64 = 100.0;

/// Page size used when a query does not give one
pub const DEFAULT_LIMIT: usize = 100;

/// A radius query around a point, paginated by creation time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationQuery {
    pub location: Location,
    pub radius_meters: f64,
    pub limit: usize,
    /// Only messages created strictly after this instant
    pub after: DateTime<Utc>,
}

impl LocationQuery {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            radius_meters: DEFAULT_RADIUS_METERS,
            limit: DEFAULT_LIMIT,
            after: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

/// Application service for message operations
pub struct MessageService {
    repo: Arc<dyn MessageRepository>,
    timeout: Duration,
}

impl MessageService {
    pub fn new(repo: Arc<dyn MessageRepository>, timeout: Duration) -> Self {
        Self { repo, timeout }
    }

    async fn with_deadline<T, F>(&self, operation: F) -> Result<T, RepositoryError>
    where
        F: Future<Output = Result<T, RepositoryError>>,
    {
        tokio::time::timeout(self.timeout, operation)
            .await
            .map_err(|_| RepositoryError::Timeout(self.timeout))?
    }

    /// Post a new message
    pub async fn post(&self, message: Message) -> Result<StoredMessage, RepositoryError> {
        let stored = self.with_deadline(self.repo.add_message(message)).await?;

        tracing::info!(
            id = %stored.id,
            sender = %stored.message.sender.id,
            "Posted message"
        );

        Ok(stored)
    }

    /// Get a message by id
    pub async fn get(&self, id: &str) -> Result<StoredMessage, RepositoryError> {
        self.with_deadline(self.repo.get_message(id)).await
    }

    /// Messages near a point, ascending by creation time
    pub async fn near(&self, query: LocationQuery) -> Result<Vec<StoredMessage>, RepositoryError> {
        let messages = self
            .with_deadline(self.repo.get_messages_for_location(
                query.location,
                query.radius_meters,
                query.limit,
                query.after,
            ))
            .await?;

        tracing::debug!(
            long = query.location.long,
            lat = query.location.lat,
            radius = query.radius_meters,
            found = messages.len(),
            "Location query"
        );

        Ok(messages)
    }

    /// Load a JSON array of messages from `path` into the repository
    pub async fn seed_from_file(&self, path: &Path) -> anyhow::Result<usize> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read initial dataset from {:?}", path))?;

        let messages: Vec<Message> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse initial dataset {:?}", path))?;

        let count = messages.len();
        for message in messages {
            self.post(message)
                .await
                .context("Failed to store initial dataset message")?;
        }

        tracing::info!(count, "Loaded initial dataset");

        Ok(count)
    }
}
