use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-day record of the not-yet-scored trailing win streak.
///
/// Mutated as events arrive during the day; once `banked` is true the entry
/// is frozen and further updates are no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakBankEntry {
    pub day: NaiveDate,
    pub pending_streak: i64,
    pub banked: bool,
}

impl StreakBankEntry {
    pub fn new(day: NaiveDate) -> Self {
        Self {
            day,
            pending_streak: 0,
            banked: false,
        }
    }
}
