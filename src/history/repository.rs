use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{EventKind, MatchEvent, MatchRecord};
use crate::provider::models::MatchPayload;
use crate::shared::{AppError, DayWindow};

/// Trait for the persisted match history (records + outcome events)
#[async_trait]
pub trait MatchHistoryRepository: Send + Sync {
    /// Whether `(match_id, player_key)` has already been accepted
    async fn has_match(&self, match_id: &str, player_key: &str) -> Result<bool, AppError>;

    /// Persists a record and its outcome event atomically; both writes or
    /// neither. Revisiting an already-recorded match is a no-op.
    async fn insert_match(&self, record: &MatchRecord, kind: EventKind)
        -> Result<(), AppError>;

    /// Events for the player whose parent record ended inside `window`,
    /// ordered by `ended_at` ascending
    async fn events_in_window(
        &self,
        player_key: &str,
        window: DayWindow,
    ) -> Result<Vec<MatchEvent>, AppError>;
}

/// Trait for the write-once raw provider payload cache
#[async_trait]
pub trait RawMatchRepository: Send + Sync {
    async fn get(&self, match_id: &str) -> Result<Option<MatchPayload>, AppError>;

    /// First write wins; storing the same match id again is a no-op
    async fn put(&self, match_id: &str, payload: &MatchPayload) -> Result<(), AppError>;
}

/// In-memory implementation of MatchHistoryRepository for development and
/// testing
#[derive(Default)]
pub struct InMemoryMatchHistoryRepository {
    records: Mutex<HashMap<(String, String), MatchRecord>>,
    events: Mutex<Vec<MatchEvent>>,
}

impl InMemoryMatchHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total persisted events (useful for idempotency assertions)
    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Total persisted records
    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl MatchHistoryRepository for InMemoryMatchHistoryRepository {
    async fn has_match(&self, match_id: &str, player_key: &str) -> Result<bool, AppError> {
        let records = self.records.lock().unwrap();
        Ok(records.contains_key(&(match_id.to_string(), player_key.to_string())))
    }

    async fn insert_match(
        &self,
        record: &MatchRecord,
        kind: EventKind,
    ) -> Result<(), AppError> {
        let mut records = self.records.lock().unwrap();
        let key = (record.match_id.clone(), record.player_key.clone());
        if records.contains_key(&key) {
            debug!(match_id = %record.match_id, "Match already recorded, skipping");
            return Ok(());
        }

        let mut events = self.events.lock().unwrap();
        let duplicate_event = events.iter().any(|e| {
            e.match_id == record.match_id && e.player_key == record.player_key && e.kind == kind
        });
        if !duplicate_event {
            events.push(MatchEvent {
                match_id: record.match_id.clone(),
                player_key: record.player_key.clone(),
                kind,
                ended_at: record.ended_at,
            });
        }
        records.insert(key, record.clone());

        Ok(())
    }

    async fn events_in_window(
        &self,
        player_key: &str,
        window: DayWindow,
    ) -> Result<Vec<MatchEvent>, AppError> {
        let events = self.events.lock().unwrap();
        let mut in_window: Vec<MatchEvent> = events
            .iter()
            .filter(|e| e.player_key == player_key && window.contains(e.ended_at))
            .cloned()
            .collect();
        // match_id tie-break keeps simultaneous events in a stable order
        in_window.sort_by(|a, b| {
            a.ended_at
                .cmp(&b.ended_at)
                .then_with(|| a.match_id.cmp(&b.match_id))
        });
        Ok(in_window)
    }
}

/// In-memory implementation of the raw payload cache
#[derive(Default)]
pub struct InMemoryRawMatchRepository {
    payloads: Mutex<HashMap<String, MatchPayload>>,
}

impl InMemoryRawMatchRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RawMatchRepository for InMemoryRawMatchRepository {
    async fn get(&self, match_id: &str) -> Result<Option<MatchPayload>, AppError> {
        Ok(self.payloads.lock().unwrap().get(match_id).cloned())
    }

    async fn put(&self, match_id: &str, payload: &MatchPayload) -> Result<(), AppError> {
        self.payloads
            .lock()
            .unwrap()
            .entry(match_id.to_string())
            .or_insert_with(|| payload.clone());
        Ok(())
    }
}

/// PostgreSQL implementation of the match history
pub struct PostgresMatchHistoryRepository {
    pool: PgPool,
}

impl PostgresMatchHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchHistoryRepository for PostgresMatchHistoryRepository {
    #[instrument(skip(self))]
    async fn has_match(&self, match_id: &str, player_key: &str) -> Result<bool, AppError> {
        let row = sqlx::query(
            "SELECT 1 AS present FROM matches WHERE match_id = $1 AND player_key = $2",
        )
        .bind(match_id)
        .bind(player_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, match_id = %match_id, "Failed to check match existence");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.is_some())
    }

    #[instrument(skip(self, record))]
    async fn insert_match(
        &self,
        record: &MatchRecord,
        kind: EventKind,
    ) -> Result<(), AppError> {
        debug!(match_id = %record.match_id, kind = kind.as_str(), "Persisting match");

        let mut tx = self.pool.begin().await.map_err(|e| {
            warn!(error = %e, "Failed to begin transaction");
            AppError::DatabaseError(e.to_string())
        })?;

        sqlx::query(
            "INSERT INTO matches (match_id, player_key, queue_id, created_at, ended_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (match_id, player_key) DO NOTHING",
        )
        .bind(&record.match_id)
        .bind(&record.player_key)
        .bind(record.queue_id)
        .bind(record.created_at)
        .bind(record.ended_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            warn!(error = %e, match_id = %record.match_id, "Failed to insert match record");
            AppError::DatabaseError(e.to_string())
        })?;

        sqlx::query(
            "INSERT INTO match_events (match_id, player_key, kind) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (match_id, kind, player_key) DO NOTHING",
        )
        .bind(&record.match_id)
        .bind(&record.player_key)
        .bind(kind.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            warn!(error = %e, match_id = %record.match_id, "Failed to insert match event");
            AppError::DatabaseError(e.to_string())
        })?;

        tx.commit().await.map_err(|e| {
            warn!(error = %e, match_id = %record.match_id, "Failed to commit match insert");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(match_id = %record.match_id, "Match persisted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn events_in_window(
        &self,
        player_key: &str,
        window: DayWindow,
    ) -> Result<Vec<MatchEvent>, AppError> {
        let rows = sqlx::query(
            "SELECT e.match_id, e.player_key, e.kind, m.ended_at \
             FROM match_events e \
             JOIN matches m ON m.match_id = e.match_id AND m.player_key = e.player_key \
             WHERE e.player_key = $1 AND m.ended_at >= $2 AND m.ended_at < $3 \
             ORDER BY m.ended_at ASC, e.match_id ASC",
        )
        .bind(player_key)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to load events for window");
            AppError::DatabaseError(e.to_string())
        })?;

        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            let kind_str: String = row.get("kind");
            let kind = EventKind::from_str(&kind_str).ok_or_else(|| {
                warn!(kind = %kind_str, "Unknown event kind in store");
                AppError::DatabaseError(format!("unknown event kind '{}'", kind_str))
            })?;
            events.push(MatchEvent {
                match_id: row.get("match_id"),
                player_key: row.get("player_key"),
                kind,
                ended_at: row.get("ended_at"),
            });
        }

        Ok(events)
    }
}

/// PostgreSQL implementation of the raw payload cache
pub struct PostgresRawMatchRepository {
    pool: PgPool,
}

impl PostgresRawMatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RawMatchRepository for PostgresRawMatchRepository {
    #[instrument(skip(self))]
    async fn get(&self, match_id: &str) -> Result<Option<MatchPayload>, AppError> {
        let row = sqlx::query("SELECT payload FROM raw_matches WHERE match_id = $1")
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, match_id = %match_id, "Failed to read raw match cache");
                AppError::DatabaseError(e.to_string())
            })?;

        match row {
            Some(row) => {
                let raw: String = row.get("payload");
                let payload = serde_json::from_str(&raw).map_err(|e| {
                    warn!(error = %e, match_id = %match_id, "Corrupt cached payload");
                    AppError::DatabaseError(e.to_string())
                })?;
                Ok(Some(payload))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, payload))]
    async fn put(&self, match_id: &str, payload: &MatchPayload) -> Result<(), AppError> {
        let raw = serde_json::to_string(payload).map_err(|e| {
            warn!(error = %e, match_id = %match_id, "Failed to serialize payload");
            AppError::Internal
        })?;

        sqlx::query(
            "INSERT INTO raw_matches (match_id, payload) VALUES ($1, $2) \
             ON CONFLICT (match_id) DO NOTHING",
        )
        .bind(match_id)
        .bind(raw)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, match_id = %match_id, "Failed to write raw match cache");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }
}
