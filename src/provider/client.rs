use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::models::{MatchPayload, RiotAccount};
use crate::config::ProviderConfig;
use crate::shared::AppError;

/// Fallback wait when a 429 response carries no Retry-After header
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// Trait for the external match-history provider
#[async_trait]
pub trait MatchProvider: Send + Sync {
    /// Resolves a display name + tag into the stable player key (puuid)
    async fn resolve_identity(&self, game_name: &str, tag_line: &str)
        -> Result<String, AppError>;

    /// Recent match ids for the player, newest first
    async fn list_recent_match_ids(
        &self,
        player_key: &str,
        count: u32,
    ) -> Result<Vec<String>, AppError>;

    async fn get_match_payload(&self, match_id: &str) -> Result<MatchPayload, AppError>;
}

/// Riot API implementation of [`MatchProvider`] (Account-V1 + Match-V5)
pub struct RiotApiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl RiotApiClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self::with_base_url(
            format!("https://{}.api.riotgames.com", config.regional_host),
            config.api_key,
        )
    }

    /// Points the client at an explicit base URL, e.g. a local proxy
    pub fn with_base_url(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }

    /// GETs a provider endpoint, retrying exactly once after the
    /// provider-supplied delay when rate limited
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        let mut rate_limited_once = false;

        loop {
            let response = self
                .http
                .get(url)
                .header("X-Riot-Token", &self.api_key)
                .send()
                .await
                .map_err(|e| AppError::Upstream(e.to_string()))?;

            match response.status() {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    warn!(url = %url, "Provider rejected credentials");
                    return Err(AppError::Unauthorized(
                        "Riot API key rejected or endpoint not permitted".to_string(),
                    ));
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    if rate_limited_once {
                        warn!(url = %url, "Still rate limited after retry");
                        return Err(AppError::RateLimited(
                            "rate limit persisted after one retry".to_string(),
                        ));
                    }

                    let retry_after = response
                        .headers()
                        .get("Retry-After")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok())
                        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);

                    debug!(retry_after_secs = retry_after, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_secs(retry_after)).await;
                    rate_limited_once = true;
                }
                status if !status.is_success() => {
                    warn!(url = %url, status = %status, "Provider request failed");
                    return Err(AppError::Upstream(format!(
                        "provider returned {}",
                        status
                    )));
                }
                _ => {
                    return response
                        .json::<T>()
                        .await
                        .map_err(|e| AppError::Upstream(e.to_string()));
                }
            }
        }
    }
}

#[async_trait]
impl MatchProvider for RiotApiClient {
    #[instrument(skip(self))]
    async fn resolve_identity(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<String, AppError> {
        let url = format!(
            "{}/riot/account/v1/accounts/by-riot-id/{}/{}",
            self.base_url, game_name, tag_line
        );
        let account: RiotAccount = self.get_json(&url).await?;

        debug!(puuid_len = account.puuid.len(), "Resolved Riot ID");
        Ok(account.puuid)
    }

    #[instrument(skip(self, player_key))]
    async fn list_recent_match_ids(
        &self,
        player_key: &str,
        count: u32,
    ) -> Result<Vec<String>, AppError> {
        let url = format!(
            "{}/lol/match/v5/matches/by-puuid/{}/ids?start=0&count={}",
            self.base_url, player_key, count
        );
        let ids: Vec<String> = self.get_json(&url).await?;

        debug!(count = ids.len(), "Listed recent match ids");
        Ok(ids)
    }

    #[instrument(skip(self))]
    async fn get_match_payload(&self, match_id: &str) -> Result<MatchPayload, AppError> {
        let url = format!("{}/lol/match/v5/matches/{}", self.base_url, match_id);
        self.get_json(&url).await
    }
}
