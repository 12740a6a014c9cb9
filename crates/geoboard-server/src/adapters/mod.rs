//! Infrastructure Adapters
//!
//! Implementations of the `MessageRepository` port, and the factory that
//! picks one from configuration.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use anyhow::Context;
use geoboard::{MessageRepository, MessageRepositoryKind};

use crate::config::Config;

// Re-exports
pub use memory::InMemoryMessageRepository;
pub use postgres::PgMessageRepository;

/// Build the repository selected by `config`.
///
/// For PostgreSQL this connects and applies migrations before returning.
pub async fn build_message_repository(config: &Config) -> anyhow::Result<Arc<dyn MessageRepository>> {
    match config.repo_kind {
        MessageRepositoryKind::InMemory => {
            tracing::info!("Using in-memory message repository");
            Ok(Arc::new(InMemoryMessageRepository::new()))
        }
        MessageRepositoryKind::Postgresql => {
            let url = config
                .pg_url
                .as_deref()
                .context("PostgreSQL repository selected without a connection url")?;

            let repo = PgMessageRepository::connect(url, config.timeout)
                .await
                .context("Failed to connect to PostgreSQL")?;
            repo.migrate()
                .await
                .context("Failed to run database migrations")?;

            tracing::info!("Using PostgreSQL message repository");
            Ok(Arc::new(repo))
        }
    }
}
