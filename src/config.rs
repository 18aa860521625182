use std::collections::HashSet;

/// Tunables for ingestion, scoring, and plan derivation
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Losses scored per day before ingestion halts
    pub daily_loss_quota: u32,
    /// Starting value of one streak win, before escalation
    pub base_points_per_win: i64,
    /// Matches shorter than this are treated as remakes and skipped
    pub min_duration_secs: i64,
    /// Queue ids that count towards scoring
    pub allowed_queues: HashSet<i32>,
    /// Divisor applied to the banked trailing streak's hypothetical value
    /// when granting the day-end bonus
    pub bank_bonus_divisor: i64,
    /// How many recent match ids to request from the provider per call
    pub candidate_count: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            daily_loss_quota: 5,
            base_points_per_win: 5,
            min_duration_secs: 300,
            // Draft, ranked solo, blind, ranked flex
            allowed_queues: HashSet::from([400, 420, 430, 440]),
            bank_bonus_divisor: 2,
            candidate_count: 5,
        }
    }
}

/// Connection details for the Riot API
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    /// Match-V5 / Account-V1 regional routing host, e.g. "americas"
    pub regional_host: String,
}

impl ProviderConfig {
    /// Reads provider settings from the environment.
    /// `RIOT_API_KEY` is required; `RIOT_REGIONAL_HOST` defaults to "americas".
    pub fn from_env() -> Result<Self, std::env::VarError> {
        Ok(Self {
            api_key: std::env::var("RIOT_API_KEY")?,
            regional_host: std::env::var("RIOT_REGIONAL_HOST")
                .unwrap_or_else(|_| "americas".to_string()),
        })
    }
}
