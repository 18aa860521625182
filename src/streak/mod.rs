pub mod finalize_task;
pub mod models;
pub mod repository;
pub mod scoring;

pub use models::StreakBankEntry;
pub use repository::{
    InMemoryStreakBankRepository, PostgresStreakBankRepository, StreakBankRepository,
};
pub use scoring::{banked_bonus, score_events};
