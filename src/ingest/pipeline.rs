use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::cache::MatchCache;
use super::filter::MatchFilter;
use crate::history::models::{EventKind, MatchRecord};
use crate::history::repository::MatchHistoryRepository;
use crate::shared::{AppError, DayWindow};
use crate::streak::repository::StreakBankRepository;

/// Outcome of one ingestion pass
#[derive(Debug, Clone, Default)]
pub struct IngestionResult {
    /// Match ids accepted and persisted by this call, in processing order
    pub accepted_match_ids: Vec<String>,
    /// Total wins persisted for the day after this call
    pub final_win_count: u32,
    /// Total losses persisted for the day after this call
    pub final_loss_count: u32,
}

/// Orchestrates fetch-or-cache, filtering, dedup, and transactional
/// persistence of candidate matches, halting at the daily loss quota.
pub struct IngestionPipeline {
    cache: MatchCache,
    filter: MatchFilter,
    history: Arc<dyn MatchHistoryRepository>,
    bank: Arc<dyn StreakBankRepository>,
    daily_loss_quota: u32,
}

impl IngestionPipeline {
    pub fn new(
        cache: MatchCache,
        filter: MatchFilter,
        history: Arc<dyn MatchHistoryRepository>,
        bank: Arc<dyn StreakBankRepository>,
        daily_loss_quota: u32,
    ) -> Self {
        Self {
            cache,
            filter,
            history,
            bank,
            daily_loss_quota,
        }
    }

    /// Processes candidates in provider order (newest first) until exhausted
    /// or the daily loss quota is reached.
    ///
    /// Counters are seeded from events already persisted for the window, so
    /// repeated calls keep honoring the quota across requests.
    #[instrument(skip(self, candidate_ids), fields(candidates = candidate_ids.len()))]
    pub async fn ingest(
        &self,
        player_key: &str,
        candidate_ids: &[String],
        window: DayWindow,
    ) -> Result<IngestionResult, AppError> {
        let mut result = IngestionResult::default();

        for event in self.history.events_in_window(player_key, window).await? {
            match event.kind {
                EventKind::Win => result.final_win_count += 1,
                EventKind::Loss => result.final_loss_count += 1,
            }
        }

        if result.final_loss_count >= self.daily_loss_quota {
            info!(losses = result.final_loss_count, "Daily loss quota already reached");
            return Ok(result);
        }

        let mut quota_hit = false;
        let loop_outcome = self
            .process_candidates(player_key, candidate_ids, window, &mut result, &mut quota_hit)
            .await;

        // Accepted matches are committed even when the loop fails partway,
        // and already-ingested matches are dedup-skipped on the next call.
        // The bank is therefore rewritten from the persisted event log on
        // both the success and the error path, never incremented in place.
        if !result.accepted_match_ids.is_empty() {
            if let Err(e) = self.reconcile_bank(player_key, window).await {
                warn!(error = %e, "Streak bank reconciliation failed");
            }

            if quota_hit {
                if let Err(e) = self.bank.bank(window.date()).await {
                    warn!(error = %e, "Early bank finalization failed");
                }
            }
        }

        loop_outcome?;
        Ok(result)
    }

    async fn process_candidates(
        &self,
        player_key: &str,
        candidate_ids: &[String],
        window: DayWindow,
        result: &mut IngestionResult,
        quota_hit: &mut bool,
    ) -> Result<(), AppError> {
        for match_id in candidate_ids {
            if self.history.has_match(match_id, player_key).await? {
                debug!(match_id = %match_id, "Already ingested, skipping");
                continue;
            }

            // Provider failures here are fatal for the request; only
            // persistence failures below get the per-candidate skip.
            let payload = self.cache.get(match_id).await?;

            let Some(outcome) = self.filter.evaluate(&payload, player_key) else {
                debug!(match_id = %match_id, "Filtered out");
                continue;
            };

            if outcome.ended_at < window.start {
                debug!(match_id = %match_id, "Ended before the day window, skipping");
                continue;
            }

            let record = MatchRecord {
                match_id: match_id.clone(),
                player_key: player_key.to_string(),
                queue_id: outcome.queue_id,
                created_at: outcome.created_at,
                ended_at: outcome.ended_at,
            };
            let kind = EventKind::from_won(outcome.won);

            // A failed write must not advance the counters, otherwise the
            // quota accounting would drift from what is actually persisted.
            if let Err(e) = self.history.insert_match(&record, kind).await {
                warn!(match_id = %match_id, error = %e, "Persistence failed, skipping candidate");
                continue;
            }

            result.accepted_match_ids.push(match_id.clone());
            match kind {
                EventKind::Win => result.final_win_count += 1,
                EventKind::Loss => {
                    result.final_loss_count += 1;
                    if result.final_loss_count >= self.daily_loss_quota {
                        info!(losses = result.final_loss_count, "Daily loss quota reached, halting ingestion");
                        *quota_hit = true;
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Rewrites the day's pending streak from the trailing win run of the
    /// persisted event log.
    async fn reconcile_bank(&self, player_key: &str, window: DayWindow) -> Result<(), AppError> {
        let events = self.history.events_in_window(player_key, window).await?;
        if events.is_empty() {
            return Ok(());
        }

        let trailing_wins = events
            .iter()
            .rev()
            .take_while(|event| event.kind == EventKind::Win)
            .count() as i64;

        self.bank.set_pending(window.date(), trailing_wins).await
    }
}
