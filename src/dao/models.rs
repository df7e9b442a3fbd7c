use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle status of a room. Only ever moves forward.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    /// Room is open in the lobby and can be joined by code.
    Waiting,
    /// The host started the game; participants are playing the quiz.
    Playing,
    /// The game is over; the room only serves the final leaderboard.
    Finished,
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RoomStatus::Waiting => "waiting",
            RoomStatus::Playing => "playing",
            RoomStatus::Finished => "finished",
        };
        f.write_str(label)
    }
}

/// Room row persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomEntity {
    /// Primary key of the room.
    pub id: Uuid,
    /// Quiz bound to this room; the quiz itself lives outside this service.
    pub quiz_id: Uuid,
    /// User who created the room and is allowed to start/finish it.
    pub host_id: Uuid,
    /// Creator of the row; equals `host_id` on creation.
    pub created_by: Uuid,
    /// Short human-enterable join code, unique among waiting rooms.
    pub room_code: String,
    /// Current lifecycle status.
    pub status: RoomStatus,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Set when the host starts the game.
    pub started_at: Option<SystemTime>,
    /// Set when the host finishes the game.
    pub finished_at: Option<SystemTime>,
    /// Start broadcast timestamp, written together with the redirect URL.
    pub game_started_at: Option<SystemTime>,
    /// Deep link participants navigate to once the game starts.
    pub game_redirect_url: Option<String>,
    /// Display name the host picked at creation time.
    pub host_nickname: Option<String>,
}

/// Player row persisted by the storage layer.
///
/// The storage layer guarantees at most one row per `(room_id, user_id)`
/// pair, so rejoining can never fork a player's progress.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Primary key of the player row.
    pub id: Uuid,
    /// Room this membership belongs to.
    pub room_id: Uuid,
    /// Authenticated account behind this player.
    pub user_id: Uuid,
    /// Display name, mutable on rejoin.
    pub nickname: String,
    /// Current score, written by the owning client at completion.
    pub score: i32,
    /// Join timestamp, used for stable seating order.
    pub joined_at: SystemTime,
    /// Readiness flag toggled in the lobby.
    pub is_ready: bool,
    /// One-way completion flag.
    pub quiz_completed: bool,
    /// Set once when the player completes the quiz.
    pub completed_at: Option<SystemTime>,
}

/// Recorded quiz play, used for history and duplicate suppression.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizPlayEntity {
    /// Primary key of the play record.
    pub id: Uuid,
    /// Quiz that was played.
    pub quiz_id: Uuid,
    /// Account that played it.
    pub user_id: Uuid,
    /// Final score reported by the client.
    pub score: i32,
    /// Number of questions in the quiz at play time.
    pub total_questions: u32,
    /// Number of correctly answered questions.
    pub correct_answers: u32,
    /// Recording timestamp.
    pub played_at: SystemTime,
}

/// Identity of a play used to detect duplicate submissions.
///
/// Two plays with the same fingerprint recorded close together are the
/// same result reported twice, not two games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayFingerprint {
    /// Quiz that was played.
    pub quiz_id: Uuid,
    /// Account that played it.
    pub user_id: Uuid,
    /// Reported score.
    pub score: i32,
    /// Reported question count.
    pub total_questions: u32,
    /// Reported correct-answer count.
    pub correct_answers: u32,
}

impl PlayFingerprint {
    /// Whether a stored play matches this fingerprint.
    pub fn matches(&self, play: &QuizPlayEntity) -> bool {
        self.quiz_id == play.quiz_id
            && self.user_id == play.user_id
            && self.score == play.score
            && self.total_questions == play.total_questions
            && self.correct_answers == play.correct_answers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_ordering_follows_lifecycle() {
        assert!(RoomStatus::Waiting < RoomStatus::Playing);
        assert!(RoomStatus::Playing < RoomStatus::Finished);
    }

    #[test]
    fn fingerprint_matches_identical_play() {
        let play = QuizPlayEntity {
            id: Uuid::new_v4(),
            quiz_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            score: 250,
            total_questions: 3,
            correct_answers: 2,
            played_at: SystemTime::now(),
        };
        let fingerprint = PlayFingerprint {
            quiz_id: play.quiz_id,
            user_id: play.user_id,
            score: 250,
            total_questions: 3,
            correct_answers: 2,
        };
        assert!(fingerprint.matches(&play));

        let other = PlayFingerprint {
            score: 200,
            ..fingerprint
        };
        assert!(!other.matches(&play));
    }
}
