use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Semantic outcome of a match for one player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Win,
    Loss,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Win => "win",
            EventKind::Loss => "loss",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "win" => Some(EventKind::Win),
            "loss" => Some(EventKind::Loss),
            _ => None,
        }
    }

    pub fn from_won(won: bool) -> Self {
        if won {
            EventKind::Win
        } else {
            EventKind::Loss
        }
    }
}

/// One accepted match for one player. Append-only; a match is recorded at
/// most once per player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub player_key: String,
    pub queue_id: i32,
    pub created_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

/// Outcome event derived from a [`MatchRecord`]. Unique per
/// `(match_id, kind, player_key)`. `ended_at` is denormalized from the
/// parent record so callers can replay events chronologically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchEvent {
    pub match_id: String,
    pub player_key: String,
    pub kind: EventKind,
    pub ended_at: DateTime<Utc>,
}
