//! In-memory implementation of MessageRepository
//!
//! Messages live in a vector kept in insertion order, plus an id index into
//! that vector. Each repository owns its own lock; nothing is shared between
//! instances.
//!
//! Insertion order equals creation-time order: writes are serialized by the
//! write lock and `created_at` is read from the clock while it is held. The
//! location query relies on this to binary search the `after` cursor and
//! return the oldest matches past it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use geoboard::{
    haversine_distance, Clock, IdGenerator, Location, Message, MessageRepository,
    RepositoryError, StoredMessage, SystemClock, UuidGenerator,
};

#[derive(Default)]
struct MessageStore {
    messages: Vec<StoredMessage>,
    index_by_id: HashMap<String, usize>,
}

/// Process-local implementation of MessageRepository
pub struct InMemoryMessageRepository {
    store: RwLock<MessageStore>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::with_services(Arc::new(UuidGenerator), Arc::new(SystemClock))
    }

    pub fn with_services(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: RwLock::new(MessageStore::default()),
            ids,
            clock,
        }
    }
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn add_message(&self, message: Message) -> Result<StoredMessage, RepositoryError> {
        let received_at = self.clock.now();
        let mut store = self.store.write().await;

        let mut created_at = self.clock.now();
        if let Some(last) = store.messages.last() {
            if created_at < last.created_at {
                // Clock went backwards; keep the vector sorted by created_at.
                tracing::warn!(
                    now = %created_at,
                    last = %last.created_at,
                    "Clock moved backwards, clamping created_at"
                );
                created_at = last.created_at;
            }
        }

        let id = self.ids.next_id();
        if store.index_by_id.contains_key(&id) {
            return Err(RepositoryError::Backend(format!(
                "duplicate message id: {}",
                id
            )));
        }

        let stored = StoredMessage {
            id: id.clone(),
            created_at,
            received_at: Some(received_at),
            message,
        };

        let position = store.messages.len();
        store.messages.push(stored.clone());
        store.index_by_id.insert(id, position);

        tracing::debug!(id = %stored.id, total = position + 1, "Stored message in memory");

        Ok(stored)
    }

    async fn get_message(&self, id: &str) -> Result<StoredMessage, RepositoryError> {
        let store = self.store.read().await;

        store
            .index_by_id
            .get(id)
            .and_then(|&position| store.messages.get(position))
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(id))
    }

    async fn get_messages_for_location(
        &self,
        location: Location,
        radius_meters: f64,
        limit: usize,
        after: DateTime<Utc>,
    ) -> Result<Vec<StoredMessage>, RepositoryError> {
        let store = self.store.read().await;
        let mut found = Vec::new();

        if limit == 0 {
            return Ok(found);
        }

        // Sorted by created_at, so everything past the cursor is a suffix.
        let start = store.messages.partition_point(|m| m.created_at <= after);

        for message in &store.messages[start..] {
            if haversine_distance(&location, message.location()) <= radius_meters {
                found.push(message.clone());
                if found.len() >= limit {
                    break;
                }
            }
        }

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use geoboard::Sender;
    use std::sync::Mutex;

    /// Clock that replays a fixed list of instants, repeating the last one
    struct ScriptedClock {
        instants: Mutex<Vec<DateTime<Utc>>>,
    }

    impl ScriptedClock {
        fn new(mut instants: Vec<DateTime<Utc>>) -> Self {
            instants.reverse();
            Self {
                instants: Mutex::new(instants),
            }
        }
    }

    impl Clock for ScriptedClock {
        fn now(&self) -> DateTime<Utc> {
            let mut instants = self.instants.lock().unwrap();
            if instants.len() > 1 {
                instants.pop().unwrap()
            } else {
                instants[0]
            }
        }
    }

    struct FixedIds;

    impl IdGenerator for FixedIds {
        fn next_id(&self) -> String {
            "always-the-same".to_string()
        }
    }

    fn message_at(long: f64, lat: f64, content: &str) -> Message {
        Message::new(Sender::new("u-1", "alice"), content, Location::new(long, lat))
            .with_client_id("client-1")
    }

    fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH
    }

    async fn count_all(repo: &InMemoryMessageRepository) -> usize {
        repo.store.read().await.messages.len()
    }

    #[tokio::test]
    async fn test_add_then_get_returns_same_message() {
        let repo = InMemoryMessageRepository::new();
        let start = Utc::now();
        let msg = message_at(-73.0, 40.0, "hello").with_sent_at(start);

        let stored = repo.add_message(msg.clone()).await.unwrap();
        let fetched = repo.get_message(&stored.id).await.unwrap();

        assert!(!stored.id.is_empty());
        assert!(stored.created_at >= start);
        assert!(stored.received_at.is_some());
        assert_eq!(fetched.message, msg);
        assert_eq!(fetched, stored);
    }

    #[tokio::test]
    async fn test_get_missing_id_is_not_found() {
        let repo = InMemoryMessageRepository::new();
        repo.add_message(message_at(0.0, 0.0, "x")).await.unwrap();

        let err = repo.get_message("nonexistent-id").await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_is_idempotent() {
        let repo = InMemoryMessageRepository::new();
        let stored = repo.add_message(message_at(1.0, 1.0, "x")).await.unwrap();

        let first = repo.get_message(&stored.id).await.unwrap();
        let second = repo.get_message(&stored.id).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_created_at_non_decreasing() {
        let repo = InMemoryMessageRepository::new();
        let mut previous = epoch();

        for i in 0..50 {
            let stored = repo
                .add_message(message_at(0.0, 0.0, &i.to_string()))
                .await
                .unwrap();
            assert!(stored.created_at >= previous);
            previous = stored.created_at;
        }
    }

    #[tokio::test]
    async fn test_radius_scenario() {
        let repo = InMemoryMessageRepository::new();
        let stored = repo.add_message(message_at(-73.0, 40.0, "nyc")).await.unwrap();
        let center = Location::new(-73.001, 40.001);

        let within = repo
            .get_messages_for_location(center, 200.0, 10, epoch())
            .await
            .unwrap();
        let outside = repo
            .get_messages_for_location(center, 50.0, 10, epoch())
            .await
            .unwrap();

        assert_eq!(within, vec![stored]);
        assert!(outside.is_empty());
    }

    #[tokio::test]
    async fn test_query_respects_limit_and_ascending_order() {
        let repo = InMemoryMessageRepository::new();
        for i in 0..5 {
            repo.add_message(message_at(10.0, 10.0, &format!("m{}", i)))
                .await
                .unwrap();
        }

        let results = repo
            .get_messages_for_location(Location::new(10.0, 10.0), 1.0, 3, epoch())
            .await
            .unwrap();

        let contents: Vec<&str> = results.iter().map(|m| m.message.content.as_str()).collect();
        assert_eq!(contents, vec!["m0", "m1", "m2"]);
        assert!(results.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[tokio::test]
    async fn test_paging_by_cursor_visits_every_message() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = ScriptedClock::new((0..14).map(|i| base + Duration::seconds(i)).collect());
        let repo = InMemoryMessageRepository::with_services(Arc::new(UuidGenerator), Arc::new(clock));
        for i in 0..5 {
            repo.add_message(message_at(10.0, 10.0, &format!("m{}", i)))
                .await
                .unwrap();
        }
        // A far message interleaved with the page must not stall the cursor.
        repo.add_message(message_at(50.0, 50.0, "far")).await.unwrap();
        repo.add_message(message_at(10.0, 10.0, "m5")).await.unwrap();

        let mut seen = Vec::new();
        let mut after = epoch();
        loop {
            let page = repo
                .get_messages_for_location(Location::new(10.0, 10.0), 1.0, 2, after)
                .await
                .unwrap();
            let Some(last) = page.last() else { break };
            after = last.created_at;
            seen.extend(page.iter().map(|m| m.message.content.clone()));
        }

        assert_eq!(seen, vec!["m0", "m1", "m2", "m3", "m4", "m5"]);
    }

    #[tokio::test]
    async fn test_zero_limit_is_empty() {
        let repo = InMemoryMessageRepository::new();
        repo.add_message(message_at(0.0, 0.0, "x")).await.unwrap();

        let results = repo
            .get_messages_for_location(Location::new(0.0, 0.0), 100.0, 0, epoch())
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_after_cursor_is_strict() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = ScriptedClock::new(vec![
            base,
            base,
            base + Duration::seconds(1),
            base + Duration::seconds(1),
            base + Duration::seconds(2),
            base + Duration::seconds(2),
        ]);
        let repo = InMemoryMessageRepository::with_services(Arc::new(UuidGenerator), Arc::new(clock));
        for content in ["a", "b", "c"] {
            repo.add_message(message_at(0.0, 0.0, content)).await.unwrap();
        }

        let results = repo
            .get_messages_for_location(
                Location::new(0.0, 0.0),
                10.0,
                10,
                base + Duration::seconds(1),
            )
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].message.content, "c");
    }

    #[tokio::test]
    async fn test_results_satisfy_predicates() {
        let repo = InMemoryMessageRepository::new();
        let center = Location::new(2.35, 48.85);
        for i in 0..40 {
            let offset = i as f64 * 0.0005;
            repo.add_message(message_at(2.35 + offset, 48.85, &i.to_string()))
                .await
                .unwrap();
        }
        let cutoff = repo.get_messages_for_location(center, 1e9, 40, epoch()).await.unwrap()[9]
            .created_at;

        let results = repo
            .get_messages_for_location(center, 500.0, 7, cutoff)
            .await
            .unwrap();

        assert!(results.len() <= 7);
        for m in &results {
            assert!(haversine_distance(&center, m.location()) <= 500.0);
            assert!(m.created_at > cutoff);
        }
    }

    #[tokio::test]
    async fn test_clock_rollback_keeps_insertion_order_sorted() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let clock = ScriptedClock::new(vec![
            base,
            base,
            base - Duration::minutes(5),
            base - Duration::minutes(5),
            base + Duration::seconds(1),
            base + Duration::seconds(1),
        ]);
        let repo = InMemoryMessageRepository::with_services(Arc::new(UuidGenerator), Arc::new(clock));

        let first = repo.add_message(message_at(0.0, 0.0, "a")).await.unwrap();
        let second = repo.add_message(message_at(0.0, 0.0, "b")).await.unwrap();
        let third = repo.add_message(message_at(0.0, 0.0, "c")).await.unwrap();

        assert_eq!(second.created_at, first.created_at);
        assert!(third.created_at > second.created_at);

        // The cursor search must not skip the clamped message.
        let results = repo
            .get_messages_for_location(
                Location::new(0.0, 0.0),
                10.0,
                10,
                base - Duration::minutes(10),
            )
            .await
            .unwrap();
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_generated_id_is_rejected() {
        let repo = InMemoryMessageRepository::with_services(Arc::new(FixedIds), Arc::new(SystemClock));
        repo.add_message(message_at(0.0, 0.0, "a")).await.unwrap();

        let err = repo.add_message(message_at(0.0, 0.0, "b")).await.unwrap_err();

        assert!(matches!(err, RepositoryError::Backend(_)));
        assert_eq!(count_all(&repo).await, 1);
    }

    #[tokio::test]
    async fn test_instances_do_not_share_state() {
        let one = InMemoryMessageRepository::new();
        let two = InMemoryMessageRepository::new();
        let stored = one.add_message(message_at(0.0, 0.0, "a")).await.unwrap();

        assert!(two.get_message(&stored.id).await.unwrap_err().is_not_found());
        assert_eq!(count_all(&two).await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds() {
        let repo = Arc::new(InMemoryMessageRepository::new());
        let mut handles = Vec::new();

        for task in 0..8 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                for i in 0..25 {
                    repo.add_message(message_at(0.0, 0.0, &format!("{}-{}", task, i)))
                        .await
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let all = repo
            .get_messages_for_location(Location::new(0.0, 0.0), 1.0, 1000, epoch())
            .await
            .unwrap();
        assert_eq!(all.len(), 200);
        assert!(all.windows(2).all(|w| w[0].created_at <= w[1].created_at));

        let unique: std::collections::HashSet<&str> = all.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(unique.len(), 200);
    }
}
