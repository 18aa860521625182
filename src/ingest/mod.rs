pub mod cache;
pub mod filter;
pub mod pipeline;

pub use cache::MatchCache;
pub use filter::{MatchFilter, Outcome};
pub use pipeline::{IngestionPipeline, IngestionResult};
