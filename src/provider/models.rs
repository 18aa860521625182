use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Riot Account-V1 response for a Riot ID lookup
#[derive(Debug, Clone, Deserialize)]
pub struct RiotAccount {
    pub puuid: String,
}

/// Raw Match-V5 payload as returned by the provider.
///
/// Only the fields the filter and pipeline consume are modeled; the rest of
/// the payload is dropped at deserialization but preserved verbatim in the
/// raw match cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchPayload {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    pub match_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    pub queue_id: i32,
    /// Playable length of the match, in seconds
    pub game_duration: i64,
    /// Unix epoch milliseconds
    pub game_start_timestamp: i64,
    /// Unix epoch milliseconds
    pub game_end_timestamp: i64,
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub puuid: String,
    pub win: bool,
    #[serde(default)]
    pub game_ended_in_early_surrender: bool,
}

impl MatchInfo {
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.game_start_timestamp).single()
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.game_end_timestamp).single()
    }

    pub fn participant(&self, puuid: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.puuid == puuid)
    }
}

#[cfg(test)]
pub mod test_payloads {
    use super::*;

    /// Builds a minimal valid payload for filter and pipeline tests
    pub fn payload(
        match_id: &str,
        puuid: &str,
        won: bool,
        queue_id: i32,
        duration_secs: i64,
        end_millis: i64,
    ) -> MatchPayload {
        MatchPayload {
            metadata: MatchMetadata {
                match_id: match_id.to_string(),
            },
            info: MatchInfo {
                queue_id,
                game_duration: duration_secs,
                game_start_timestamp: end_millis - duration_secs * 1000,
                game_end_timestamp: end_millis,
                participants: vec![
                    Participant {
                        puuid: puuid.to_string(),
                        win: won,
                        game_ended_in_early_surrender: false,
                    },
                    Participant {
                        puuid: "opponent".to_string(),
                        win: !won,
                        game_ended_in_early_surrender: false,
                    },
                ],
            },
        }
    }
}
