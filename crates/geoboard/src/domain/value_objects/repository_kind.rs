//! MessageRepositoryKind - Which backend stores messages

use serde::{Deserialize, Serialize};

/// Storage backend selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageRepositoryKind {
    /// Process-local store, lost on exit
    #[default]
    InMemory,
    /// PostgreSQL with the PostGIS extension
    Postgresql,
}

impl std::fmt::Display for MessageRepositoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRepositoryKind::InMemory => write!(f, "IN_MEMORY"),
            MessageRepositoryKind::Postgresql => write!(f, "POSTGRESQL"),
        }
    }
}

impl std::str::FromStr for MessageRepositoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "IN_MEMORY" => Ok(MessageRepositoryKind::InMemory),
            "POSTGRESQL" => Ok(MessageRepositoryKind::Postgresql),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}
