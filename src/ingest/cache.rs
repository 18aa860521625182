use std::sync::Arc;
use tracing::{debug, instrument};

use crate::history::repository::RawMatchRepository;
use crate::provider::models::MatchPayload;
use crate::provider::MatchProvider;
use crate::shared::AppError;

/// Fetch-or-cache front for raw provider payloads.
///
/// A concluded match is immutable, so entries never go stale and there is no
/// eviction. First touch fetches from the provider and writes through;
/// subsequent touches are read-only. Fetch failures propagate and are not
/// cached.
pub struct MatchCache {
    raw: Arc<dyn RawMatchRepository>,
    provider: Arc<dyn MatchProvider>,
}

impl MatchCache {
    pub fn new(raw: Arc<dyn RawMatchRepository>, provider: Arc<dyn MatchProvider>) -> Self {
        Self { raw, provider }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, match_id: &str) -> Result<MatchPayload, AppError> {
        if let Some(payload) = self.raw.get(match_id).await? {
            debug!(match_id = %match_id, "Raw match cache hit");
            return Ok(payload);
        }

        debug!(match_id = %match_id, "Raw match cache miss, fetching from provider");
        let payload = self.provider.get_match_payload(match_id).await?;
        self.raw.put(match_id, &payload).await?;

        Ok(payload)
    }
}
