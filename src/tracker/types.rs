use serde::{Deserialize, Serialize};

use crate::workout::PlanItem;

/// Riot ID of the player to process
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessRequest {
    pub game_name: String,
    pub tag_line: String,
}

/// Result of one "process player for today" call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub wins: u32,
    pub losses: u32,
    /// Streak points earned today, including any banked day-end bonus
    pub daily_points: i64,
    /// Points left after discounting the exercise plan
    pub remaining_points: i64,
    pub exercise_plan: Vec<PlanItem>,
    /// Match ids accepted by this call, newest first
    pub new_matches: Vec<String>,
}
