use tracing::{info, instrument};

use super::types::ProcessResponse;
use crate::ingest::{IngestionPipeline, MatchCache, MatchFilter};
use crate::shared::{AppError, AppState, DayWindow};
use crate::streak::{banked_bonus, score_events};
use crate::workout::derive_plan;

/// Orchestrates the full "process player for today" flow: identity
/// resolution, ingestion, scoring, and plan derivation.
pub struct TrackerService {
    state: AppState,
}

impl TrackerService {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    #[instrument(skip(self), fields(game_name = %game_name))]
    pub async fn process_player(
        &self,
        game_name: &str,
        tag_line: &str,
        window: DayWindow,
    ) -> Result<ProcessResponse, AppError> {
        let config = &self.state.config;

        let player_key = self
            .state
            .provider
            .resolve_identity(game_name, tag_line)
            .await?;

        let candidates = self
            .state
            .provider
            .list_recent_match_ids(&player_key, config.candidate_count)
            .await?;

        let pipeline = IngestionPipeline::new(
            MatchCache::new(
                self.state.raw_match_repository.clone(),
                self.state.provider.clone(),
            ),
            MatchFilter::new(config),
            self.state.history_repository.clone(),
            self.state.streak_bank_repository.clone(),
            config.daily_loss_quota,
        );
        let ingestion = pipeline.ingest(&player_key, &candidates, window).await?;

        // Scoring always recomputes from the persisted event log; ingestion
        // left no authoritative state in memory.
        let events = self
            .state
            .history_repository
            .events_in_window(&player_key, window)
            .await?;
        let streak_points =
            score_events(&events, config.base_points_per_win, config.daily_loss_quota);

        let bank_entry = self
            .state
            .streak_bank_repository
            .get(window.date())
            .await?;
        let bonus = banked_bonus(
            bank_entry.as_ref(),
            config.base_points_per_win,
            config.bank_bonus_divisor,
        );
        let daily_points = streak_points + bonus;

        let plan = derive_plan(ingestion.final_loss_count, daily_points);

        info!(
            wins = ingestion.final_win_count,
            losses = ingestion.final_loss_count,
            daily_points,
            new_matches = ingestion.accepted_match_ids.len(),
            "Processed player"
        );

        Ok(ProcessResponse {
            wins: ingestion.final_win_count,
            losses: ingestion.final_loss_count,
            daily_points,
            remaining_points: plan.remaining_points,
            exercise_plan: plan.items,
            new_matches: ingestion.accepted_match_ids,
        })
    }
}
