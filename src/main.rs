mod config;
mod history;
mod ingest;
mod provider;
mod shared;
mod streak;
mod tracker;
mod workout;

use axum::{routing::post, Router};
use config::{EngineConfig, ProviderConfig};
use history::repository::{
    InMemoryMatchHistoryRepository, InMemoryRawMatchRepository, MatchHistoryRepository,
    PostgresMatchHistoryRepository, PostgresRawMatchRepository, RawMatchRepository,
};
use provider::RiotApiClient;
use shared::AppState;
use std::sync::Arc;
use streak::finalize_task::{start_finalize_task, FinalizeConfig};
use streak::repository::{
    InMemoryStreakBankRepository, PostgresStreakBankRepository, StreakBankRepository,
};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matchfit=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting matchfit tracker");

    let provider_config = ProviderConfig::from_env().expect("RIOT_API_KEY must be set");
    let provider = Arc::new(RiotApiClient::new(provider_config));

    // Postgres when DATABASE_URL is set, in-memory otherwise (development)
    let (history_repository, raw_match_repository, streak_bank_repository): (
        Arc<dyn MatchHistoryRepository>,
        Arc<dyn RawMatchRepository>,
        Arc<dyn StreakBankRepository>,
    ) = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = sqlx::PgPool::connect(&database_url)
                .await
                .expect("Failed to connect to database");
            info!("Using PostgreSQL persistence");
            (
                Arc::new(PostgresMatchHistoryRepository::new(pool.clone())),
                Arc::new(PostgresRawMatchRepository::new(pool.clone())),
                Arc::new(PostgresStreakBankRepository::new(pool)),
            )
        }
        Err(_) => {
            info!("DATABASE_URL not set, using in-memory persistence");
            (
                Arc::new(InMemoryMatchHistoryRepository::new()),
                Arc::new(InMemoryRawMatchRepository::new()),
                Arc::new(InMemoryStreakBankRepository::new()),
            )
        }
    };

    let app_state = AppState::new(
        provider,
        history_repository,
        raw_match_repository,
        streak_bank_repository.clone(),
        EngineConfig::default(),
    );

    // Daily bank finalization runs alongside the request handlers
    tokio::spawn(start_finalize_task(
        streak_bank_repository,
        FinalizeConfig::default(),
    ));

    let app = Router::new()
        .route("/process", post(tracker::process_player))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("Server running on http://localhost:3000");
    axum::serve(listener, app).await.unwrap();
}
