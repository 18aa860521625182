pub mod client;
pub mod models;

pub use client::{MatchProvider, RiotApiClient};
pub use models::{MatchInfo, MatchMetadata, MatchPayload, Participant};
