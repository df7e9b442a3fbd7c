use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Query parameters for the leaderboard projection.
#[derive(Debug, Deserialize, IntoParams)]
pub struct LeaderboardQuery {
    /// Question count of the quiz being played; quiz content lives outside
    /// this service, so the caller supplies it. Percentages are 0 when
    /// omitted.
    pub total_questions: Option<u32>,
}

/// One ranked row of the live leaderboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    /// 1-based rank after sorting by score descending.
    pub rank: u32,
    /// Player row identifier.
    pub player_id: Uuid,
    /// Account behind the player.
    pub user_id: Uuid,
    /// Display name.
    pub nickname: String,
    /// Current score.
    pub score: i32,
    /// Score as a percentage of the maximum attainable (100 per question).
    pub percentage: u32,
    /// Whether this player already finished the quiz.
    pub quiz_completed: bool,
    /// Completion timestamp, present once completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

/// Live leaderboard snapshot, recomputed per request.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    /// Ranked entries, ties keeping seating order.
    pub entries: Vec<LeaderboardEntry>,
    /// Question count used for the percentage column.
    pub total_questions: u32,
}
