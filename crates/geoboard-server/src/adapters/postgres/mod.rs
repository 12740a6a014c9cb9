//! PostgreSQL Repository Implementations

mod geometry;
mod message_repository;

pub use message_repository::PgMessageRepository;
