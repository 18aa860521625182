use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::config::EngineConfig;
use crate::history::repository::{MatchHistoryRepository, RawMatchRepository};
use crate::provider::MatchProvider;
use crate::streak::repository::StreakBankRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn MatchProvider>,
    pub history_repository: Arc<dyn MatchHistoryRepository>,
    pub raw_match_repository: Arc<dyn RawMatchRepository>,
    pub streak_bank_repository: Arc<dyn StreakBankRepository>,
    pub config: EngineConfig,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn MatchProvider>,
        history_repository: Arc<dyn MatchHistoryRepository>,
        raw_match_repository: Arc<dyn RawMatchRepository>,
        streak_bank_repository: Arc<dyn StreakBankRepository>,
        config: EngineConfig,
    ) -> Self {
        Self {
            provider,
            history_repository,
            raw_match_repository,
            streak_bank_repository,
            config,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limited by upstream: {0}")]
    RateLimited(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::RateLimited(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Rate limited by upstream: {}", msg),
            ),
            AppError::Upstream(msg) => {
                (StatusCode::BAD_GATEWAY, format!("Upstream error: {}", msg))
            }
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

/// Half-open time interval `[start, end)` covering one scoring day.
///
/// Built once at the request boundary so every downstream component is
/// timezone-agnostic and testable with fixed intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// Window covering the given calendar day in UTC
    pub fn for_date(date: NaiveDate) -> Self {
        let start = date
            .and_hms_opt(0, 0, 0)
            .expect("midnight is valid")
            .and_utc();
        Self {
            start,
            end: start + Duration::days(1),
        }
    }

    /// Window covering the current UTC day
    pub fn today() -> Self {
        Self::for_date(Utc::now().date_naive())
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Calendar day this window covers
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_window_is_half_open() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let window = DayWindow::for_date(date);

        assert!(window.contains(window.start));
        assert!(!window.contains(window.end));
        assert_eq!(window.date(), date);
        assert_eq!(window.end - window.start, Duration::days(1));
    }
}
