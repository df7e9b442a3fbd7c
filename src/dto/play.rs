use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{dao::models::QuizPlayEntity, dto::format_system_time};

/// Payload recording a finished quiz play.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RecordPlayRequest {
    /// Quiz that was played.
    pub quiz_id: Uuid,
    /// Final score.
    #[validate(range(min = 0))]
    pub score: i32,
    /// Question count of the quiz at play time.
    #[validate(range(min = 1))]
    pub total_questions: u32,
    /// Correctly answered questions; must not exceed `total_questions`.
    pub correct_answers: u32,
}

/// Query parameters for the play history listing.
#[derive(Debug, Deserialize, IntoParams)]
pub struct PlayHistoryQuery {
    /// Maximum number of plays to return (latest play per quiz).
    pub limit: Option<usize>,
}

/// Public projection of a recorded play.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlaySummary {
    /// Play record identifier.
    pub id: Uuid,
    /// Quiz that was played.
    pub quiz_id: Uuid,
    /// Final score.
    pub score: i32,
    /// Question count at play time.
    pub total_questions: u32,
    /// Correctly answered questions.
    pub correct_answers: u32,
    /// Recording timestamp (RFC 3339).
    pub played_at: String,
}

impl From<QuizPlayEntity> for PlaySummary {
    fn from(value: QuizPlayEntity) -> Self {
        Self {
            id: value.id,
            quiz_id: value.quiz_id,
            score: value.score,
            total_questions: value.total_questions,
            correct_answers: value.correct_answers,
            played_at: format_system_time(value.played_at),
        }
    }
}

/// Response returned after submitting a play.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecordPlayResponse {
    /// The stored play; the pre-existing row when `duplicate` is true.
    pub play: PlaySummary,
    /// True when an identical submission within the suppression window
    /// was found and no new row was created.
    pub duplicate: bool,
}

/// The caller's play history, latest play per quiz.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayHistoryResponse {
    /// Plays ordered by play time descending.
    pub plays: Vec<PlaySummary>,
}
