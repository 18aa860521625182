pub mod models;
pub mod repository;

pub use models::{EventKind, MatchEvent, MatchRecord};
pub use repository::{
    InMemoryMatchHistoryRepository, InMemoryRawMatchRepository, MatchHistoryRepository,
    PostgresMatchHistoryRepository, PostgresRawMatchRepository, RawMatchRepository,
};
