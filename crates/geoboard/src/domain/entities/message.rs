//! Message Entity
//!
//! A location-tagged post, before and after a repository accepts it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Location;

/// Identity of a message author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub id: String,
    pub username: String,
}

impl Sender {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}

/// A message submission that has not been stored yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub sender: Sender,
    pub content: String,
    pub location: Location,
    /// Client-supplied correlation string
    #[serde(default)]
    pub client_id: String,
    /// Send time claimed by the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Create a new message
    pub fn new(sender: Sender, content: impl Into<String>, location: Location) -> Self {
        Self {
            sender,
            content: content.into(),
            location,
            client_id: String::new(),
            sent_at: None,
        }
    }

    /// Set the client correlation id
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Set the client-claimed send time
    pub fn with_sent_at(mut self, sent_at: DateTime<Utc>) -> Self {
        self.sent_at = Some(sent_at);
        self
    }
}

/// A message accepted by a repository.
///
/// `id` and `created_at` are assigned by the backend exactly once and never
/// change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMessage {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// When the submission was first observed by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub message: Message,
}

impl StoredMessage {
    pub fn location(&self) -> &Location {
        &self.message.location
    }
}
