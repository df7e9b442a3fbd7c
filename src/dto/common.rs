use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dao::models::{PlayerEntity, RoomEntity, RoomStatus},
    dto::format_system_time,
};

/// Public projection of a room exposed to REST and SSE clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomSnapshot {
    /// Room identifier.
    pub id: Uuid,
    /// Quiz bound to the room.
    pub quiz_id: Uuid,
    /// Account allowed to start and finish the game.
    pub host_id: Uuid,
    /// Join code shown in the lobby.
    pub room_code: String,
    /// Current lifecycle status.
    pub status: RoomStatus,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Start timestamp, present once the game started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    /// Finish timestamp, present once the game finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
    /// Start broadcast timestamp, written together with the redirect URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_started_at: Option<String>,
    /// Deep link participants navigate to once the game starts. Always
    /// present when `status` is `playing`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_redirect_url: Option<String>,
    /// Display name the host picked at creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_nickname: Option<String>,
}

impl From<RoomEntity> for RoomSnapshot {
    fn from(value: RoomEntity) -> Self {
        Self {
            id: value.id,
            quiz_id: value.quiz_id,
            host_id: value.host_id,
            room_code: value.room_code,
            status: value.status,
            created_at: format_system_time(value.created_at),
            started_at: value.started_at.map(format_system_time),
            finished_at: value.finished_at.map(format_system_time),
            game_started_at: value.game_started_at.map(format_system_time),
            game_redirect_url: value.game_redirect_url,
            host_nickname: value.host_nickname,
        }
    }
}

/// Public projection of a player row.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerSummary {
    /// Player row identifier.
    pub id: Uuid,
    /// Room this membership belongs to.
    pub room_id: Uuid,
    /// Account behind this player; clients match themselves by this field.
    pub user_id: Uuid,
    /// Display name.
    pub nickname: String,
    /// Current score.
    pub score: i32,
    /// Join timestamp (RFC 3339).
    pub joined_at: String,
    /// Lobby readiness flag.
    pub is_ready: bool,
    /// Whether the player finished the quiz.
    pub quiz_completed: bool,
    /// Completion timestamp, present once completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl From<PlayerEntity> for PlayerSummary {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id,
            room_id: value.room_id,
            user_id: value.user_id,
            nickname: value.nickname,
            score: value.score,
            joined_at: format_system_time(value.joined_at),
            is_ready: value.is_ready,
            quiz_completed: value.quiz_completed,
            completed_at: value.completed_at.map(format_system_time),
        }
    }
}
