use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::PlayerSummary;

/// Payload toggling the caller's lobby readiness.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ReadyRequest {
    /// Desired readiness state. Last write wins.
    pub ready: bool,
}

/// Payload reporting the caller's quiz completion and final score.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CompleteQuizRequest {
    /// Final score reported by the client. Not validated against the
    /// question count; the quiz itself is external.
    #[validate(range(min = 0))]
    pub score: i32,
}

/// Query parameters for leaving a room.
#[derive(Debug, Deserialize, IntoParams)]
pub struct LeaveRoomQuery {
    /// Player row to remove. Defaults to the caller's own row and must
    /// belong to the caller when given.
    pub player_id: Option<Uuid>,
}

/// Current roster of a room in seating order.
#[derive(Debug, Serialize, ToSchema)]
pub struct RosterResponse {
    /// Players ordered by join time ascending.
    pub players: Vec<PlayerSummary>,
    /// Advisory flag: enough players and everyone ready. The lobby uses
    /// it to light up the start button; starting is not gated on it.
    pub all_ready: bool,
}
