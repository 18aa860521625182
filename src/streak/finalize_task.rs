use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info, instrument};

use super::repository::StreakBankRepository;
use crate::shared::AppError;

/// Configuration for the daily bank finalization task
#[derive(Debug, Clone)]
pub struct FinalizeConfig {
    /// How often to check for unbanked previous days
    pub check_interval: Duration,
    /// How many days before today to sweep on each check
    pub backfill_days: u32,
}

impl Default for FinalizeConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(60 * 60), // hourly
            backfill_days: 7,
        }
    }
}

/// Starts the background task that finalizes previous days' streak bank
/// entries after the day boundary has passed.
///
/// Runs on a timer rather than a one-shot alarm; `bank` is idempotent, so
/// the at-least-once invocations converge to a single finalization.
#[instrument(skip(bank_repository))]
pub async fn start_finalize_task(
    bank_repository: Arc<dyn StreakBankRepository>,
    config: FinalizeConfig,
) {
    info!(
        check_interval_secs = config.check_interval.as_secs(),
        backfill_days = config.backfill_days,
        "Starting streak bank finalization task"
    );

    let mut check_interval = interval(config.check_interval);

    loop {
        check_interval.tick().await;

        let today = Utc::now().date_naive();

        match finalize_previous_days(&bank_repository, today, config.backfill_days).await {
            Ok(()) => {
                info!(%today, "Previous days' streak bank entries finalized");
            }
            Err(e) => {
                error!(%today, error = %e, "Streak bank finalization failed");
            }
        }
    }
}

/// Banks every day in the `backfill_days` window before `today`.
///
/// Sweeping a range instead of only yesterday means an outage spanning a day
/// boundary cannot leave an older day unbanked; `bank` is a no-op for absent
/// or already-banked days, so the sweep is cheap.
pub async fn finalize_previous_days(
    bank_repository: &Arc<dyn StreakBankRepository>,
    today: NaiveDate,
    backfill_days: u32,
) -> Result<(), AppError> {
    for offset in 1..=i64::from(backfill_days) {
        bank_repository.bank(today - ChronoDuration::days(offset)).await?;
    }
    Ok(())
}
