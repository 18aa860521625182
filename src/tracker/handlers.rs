use axum::{extract::State, Json};
use tracing::{info, instrument};

use super::service::TrackerService;
use super::types::{ProcessRequest, ProcessResponse};
use crate::shared::{AppError, AppState, DayWindow};

/// HTTP handler for processing a player's day
///
/// POST /process
/// Ingests new matches, recomputes today's streak points, and returns the
/// derived exercise plan
#[instrument(name = "process_player", skip(state, request))]
pub async fn process_player(
    State(state): State<AppState>,
    Json(request): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>, AppError> {
    info!(game_name = %request.game_name, "Processing player");

    let service = TrackerService::new(state);
    let response = service
        .process_player(&request.game_name, &request.tag_line, DayWindow::today())
        .await?;

    info!(
        wins = response.wins,
        losses = response.losses,
        daily_points = response.daily_points,
        "Player processed successfully"
    );

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MatchProvider;
    use crate::shared::test_utils::AppStateBuilder;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt; // for `oneshot`

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/process", axum::routing::post(process_player))
            .with_state(state)
    }

    fn request() -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/process")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"game_name": "Alice", "tag_line": "LAS"}"#,
            ))
            .unwrap()
    }

    #[tokio::test]
    async fn returns_process_response_for_quiet_day() {
        let response = app(AppStateBuilder::new().build())
            .oneshot(request())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ProcessResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.daily_points, 0);
        assert!(parsed.exercise_plan.is_empty());
    }

    struct RejectingProvider;

    #[async_trait]
    impl MatchProvider for RejectingProvider {
        async fn resolve_identity(
            &self,
            _game_name: &str,
            _tag_line: &str,
        ) -> Result<String, AppError> {
            Err(AppError::Unauthorized("API key rejected".to_string()))
        }

        async fn list_recent_match_ids(
            &self,
            _player_key: &str,
            _count: u32,
        ) -> Result<Vec<String>, AppError> {
            Ok(Vec::new())
        }

        async fn get_match_payload(
            &self,
            match_id: &str,
        ) -> Result<crate::provider::models::MatchPayload, AppError> {
            Err(AppError::Upstream(format!("unexpected fetch of {}", match_id)))
        }
    }

    #[tokio::test]
    async fn auth_failure_surfaces_as_401() {
        let state = AppStateBuilder::new()
            .with_provider(Arc::new(RejectingProvider))
            .build();

        let response = app(state).oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["error"], "API key rejected");
    }
}
