//! PostgreSQL implementation of MessageRepository
//!
//! Locations are stored in a PostGIS `geometry(Point, 4326)` column. The
//! radius predicate, cursor and ordering are evaluated by the database.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use geoboard::{
    Clock, IdGenerator, Location, Message, MessageRepository, RepositoryError, Sender,
    StoredMessage, SystemClock, UuidGenerator,
};

use super::geometry::decode_point_hex;

const SELECT_COLUMNS: &str = r#"
    SELECT m.id, l.id AS user_id, l.username, m.content,
           ST_AsHEXEWKB(m.location) AS location,
           m.client_id, m.sent_at, m.received_at, m.created_at
    FROM message m
    JOIN login l ON m.user_id = l.id
"#;

/// PostgreSQL implementation of MessageRepository
pub struct PgMessageRepository {
    pool: PgPool,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self::with_services(pool, Arc::new(UuidGenerator), Arc::new(SystemClock))
    }

    pub fn with_services(pool: PgPool, ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { pool, ids, clock }
    }

    /// Open a pool against `url`. Waiting for a connection is bounded by
    /// `acquire_timeout`.
    pub async fn connect(url: &str, acquire_timeout: Duration) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await
            .map_err(|e| RepositoryError::Backend(e.to_string()))?;

        Ok(Self::new(pool))
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::Backend(e.to_string()))
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct MessageRow {
    id: String,
    user_id: String,
    username: String,
    content: String,
    location: String,
    client_id: String,
    sent_at: Option<DateTime<Utc>>,
    received_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<MessageRow> for StoredMessage {
    type Error = RepositoryError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let location = decode_point_hex(&row.location)?;

        Ok(Self {
            id: row.id,
            created_at: row.created_at,
            received_at: row.received_at,
            message: Message {
                sender: Sender {
                    id: row.user_id,
                    username: row.username,
                },
                content: row.content,
                location,
                client_id: row.client_id,
                sent_at: row.sent_at,
            },
        })
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn add_message(&self, message: Message) -> Result<StoredMessage, RepositoryError> {
        let id = self.ids.next_id();
        let received_at = self.clock.now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Backend(e.to_string()))?;

        // First username wins; stored messages keep the sender they were posted with.
        sqlx::query(
            r#"
            INSERT INTO login (id, username)
            VALUES ($1, $2)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&message.sender.id)
        .bind(&message.sender.username)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Backend(e.to_string()))?;

        let created_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            INSERT INTO message (id, user_id, content, location, client_id, sent_at, received_at)
            VALUES ($1, $2, $3, ST_SetSRID(ST_GeomFromText($4), 4326), $5, $6, $7)
            RETURNING created_at
            "#,
        )
        .bind(&id)
        .bind(&message.sender.id)
        .bind(&message.content)
        .bind(message.location.to_wkt())
        .bind(&message.client_id)
        .bind(message.sent_at)
        .bind(received_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Backend(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Backend(e.to_string()))?;

        tracing::debug!(id = %id, "Stored message in PostgreSQL");

        Ok(StoredMessage {
            id,
            created_at,
            received_at: Some(received_at),
            message,
        })
    }

    async fn get_message(&self, id: &str) -> Result<StoredMessage, RepositoryError> {
        let row = sqlx::query_as::<_, MessageRow>(&format!("{} WHERE m.id = $1", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Backend(e.to_string()))?
            .ok_or_else(|| RepositoryError::not_found(id))?;

        row.try_into()
    }

    async fn get_messages_for_location(
        &self,
        location: Location,
        radius_meters: f64,
        limit: usize,
        after: DateTime<Utc>,
    ) -> Result<Vec<StoredMessage>, RepositoryError> {
        // PostgreSQL orders NaN above every number, so `<= NaN` would match
        // everything. Nothing is within a NaN distance.
        if limit == 0 || radius_meters.is_nan() || location.long.is_nan() || location.lat.is_nan()
        {
            return Ok(Vec::new());
        }

        // ST_DWithin on geography can use the GIST index; the slack covers the
        // radius difference between its sphere and ST_DistanceSphere's.
        let sql = format!(
            r#"{}
            WHERE ST_DWithin(
                      m.location::geography,
                      ST_SetSRID(ST_GeomFromText($1), 4326)::geography,
                      $2 * 1.0001 + 1.0,
                      false)
              AND ST_DistanceSphere(m.location, ST_SetSRID(ST_GeomFromText($1), 4326)) <= $2
              AND m.created_at > $3
            ORDER BY m.created_at ASC
            LIMIT $4
            "#,
            SELECT_COLUMNS
        );

        let rows = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(location.to_wkt())
            .bind(radius_meters)
            .bind(after)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Backend(e.to_string()))?;

        rows.into_iter().map(StoredMessage::try_from).collect()
    }
}
