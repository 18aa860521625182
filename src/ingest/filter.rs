use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::debug;

use crate::config::EngineConfig;
use crate::provider::models::MatchPayload;

/// Canonical outcome of one match for one participant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub won: bool,
    pub queue_id: i32,
    pub created_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

/// Pure predicate deciding which matches count towards scoring.
///
/// Single point of truth for match eligibility: early surrenders, remakes
/// (sub-threshold duration), disallowed queues, and matches the player did
/// not appear in are all rejected here and nowhere else.
pub struct MatchFilter {
    min_duration_secs: i64,
    allowed_queues: HashSet<i32>,
}

impl MatchFilter {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            min_duration_secs: config.min_duration_secs,
            allowed_queues: config.allowed_queues.clone(),
        }
    }

    /// Returns the player's outcome, or `None` when the match does not count
    pub fn evaluate(&self, payload: &MatchPayload, player_key: &str) -> Option<Outcome> {
        let info = &payload.info;

        if !self.allowed_queues.contains(&info.queue_id) {
            debug!(match_id = %payload.metadata.match_id, queue_id = info.queue_id, "Queue not allowed");
            return None;
        }

        if info.game_duration < self.min_duration_secs {
            debug!(match_id = %payload.metadata.match_id, duration = info.game_duration, "Match too short, treating as remake");
            return None;
        }

        let participant = info.participant(player_key)?;

        if participant.game_ended_in_early_surrender {
            debug!(match_id = %payload.metadata.match_id, "Match ended in early surrender");
            return None;
        }

        Some(Outcome {
            won: participant.win,
            queue_id: info.queue_id,
            created_at: info.started_at()?,
            ended_at: info.ended_at()?,
        })
    }
}
