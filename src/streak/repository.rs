use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::StreakBankEntry;
use crate::shared::AppError;

/// Trait for the per-day streak bank.
///
/// `set_pending` and `bank` are idempotent writes, not increments: the
/// request path and the daily finalization job commute into the same final
/// state regardless of interleaving, so no locking is needed on top of the
/// store. The pending streak always reflects the trailing win run of the
/// persisted event log; callers compute it there and write it absolutely.
#[async_trait]
pub trait StreakBankRepository: Send + Sync {
    async fn get(&self, day: NaiveDate) -> Result<Option<StreakBankEntry>, AppError>;

    /// Writes the pending streak for `day` as an absolute value, creating
    /// the entry on first touch. No-op once the day is banked.
    async fn set_pending(&self, day: NaiveDate, pending_streak: i64) -> Result<(), AppError>;

    /// Freezes the entry for `day`. Idempotent; no-op if absent.
    async fn bank(&self, day: NaiveDate) -> Result<(), AppError>;
}

/// In-memory implementation of StreakBankRepository for development and
/// testing
#[derive(Default)]
pub struct InMemoryStreakBankRepository {
    entries: Mutex<HashMap<NaiveDate, StreakBankEntry>>,
}

impl InMemoryStreakBankRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StreakBankRepository for InMemoryStreakBankRepository {
    async fn get(&self, day: NaiveDate) -> Result<Option<StreakBankEntry>, AppError> {
        Ok(self.entries.lock().unwrap().get(&day).cloned())
    }

    async fn set_pending(&self, day: NaiveDate, pending_streak: i64) -> Result<(), AppError> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .entry(day)
            .or_insert_with(|| StreakBankEntry::new(day));

        if entry.banked {
            debug!(day = %day, "Bank entry already banked, ignoring update");
            return Ok(());
        }

        entry.pending_streak = pending_streak;
        Ok(())
    }

    async fn bank(&self, day: NaiveDate) -> Result<(), AppError> {
        let mut entries = self.entries.lock().unwrap();
        if let Some(entry) = entries.get_mut(&day) {
            entry.banked = true;
        }
        Ok(())
    }
}

/// PostgreSQL implementation of the streak bank
pub struct PostgresStreakBankRepository {
    pool: PgPool,
}

impl PostgresStreakBankRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StreakBankRepository for PostgresStreakBankRepository {
    #[instrument(skip(self))]
    async fn get(&self, day: NaiveDate) -> Result<Option<StreakBankEntry>, AppError> {
        let row = sqlx::query(
            "SELECT day, pending_streak, banked FROM streak_bank WHERE day = $1",
        )
        .bind(day)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to read streak bank entry");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|row| StreakBankEntry {
            day: row.get("day"),
            pending_streak: row.get("pending_streak"),
            banked: row.get("banked"),
        }))
    }

    #[instrument(skip(self))]
    async fn set_pending(&self, day: NaiveDate, pending_streak: i64) -> Result<(), AppError> {
        // Single-statement absolute upsert keeps concurrent request handlers
        // safe without read-modify-write locking.
        sqlx::query(
            "INSERT INTO streak_bank (day, pending_streak, banked) \
             VALUES ($1, $2, FALSE) \
             ON CONFLICT (day) DO UPDATE \
             SET pending_streak = EXCLUDED.pending_streak \
             WHERE streak_bank.banked = FALSE",
        )
        .bind(day)
        .bind(pending_streak)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to update streak bank");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn bank(&self, day: NaiveDate) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE streak_bank SET banked = TRUE WHERE day = $1")
            .bind(day)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to bank streak");
                AppError::DatabaseError(e.to_string())
            })?;

        debug!(day = %day, updated = result.rows_affected(), "Streak bank finalized");
        Ok(())
    }
}
