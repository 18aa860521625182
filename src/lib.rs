// Library crate for the matchfit tracker
// This file exposes the public API for integration tests

pub mod config;
pub mod history;
pub mod ingest;
pub mod provider;
pub mod shared;
pub mod streak;
pub mod tracker;
pub mod workout;

// Re-export commonly used types for easier access in tests
pub use config::{EngineConfig, ProviderConfig};
pub use history::{EventKind, MatchEvent, MatchRecord};
pub use ingest::{IngestionPipeline, IngestionResult, MatchCache, MatchFilter, Outcome};
pub use provider::{MatchPayload, MatchProvider, RiotApiClient};
pub use shared::{AppError, AppState, DayWindow};
pub use streak::{banked_bonus, score_events, StreakBankEntry, StreakBankRepository};
pub use tracker::{ProcessRequest, ProcessResponse, TrackerService};
pub use workout::{derive_plan, ExercisePlan, PlanItem};
