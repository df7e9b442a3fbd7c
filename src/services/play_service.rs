use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::{PlayFingerprint, QuizPlayEntity},
    dto::play::{PlayHistoryResponse, RecordPlayRequest, RecordPlayResponse},
    error::ServiceError,
    state::SharedState,
};

const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Record a finished quiz play for the caller.
///
/// An identical submission (same quiz, score, question count, and correct
/// count) inside the configured window is the same result reported twice;
/// the stored row is returned instead of inserting a second one.
pub async fn record_play(
    state: &SharedState,
    caller: Uuid,
    request: RecordPlayRequest,
) -> Result<RecordPlayResponse, ServiceError> {
    if request.correct_answers > request.total_questions {
        return Err(ServiceError::InvalidInput(format!(
            "correct answers ({}) cannot exceed question count ({})",
            request.correct_answers, request.total_questions
        )));
    }

    let store = state.require_room_store().await?;
    let now = SystemTime::now();

    let fingerprint = PlayFingerprint {
        quiz_id: request.quiz_id,
        user_id: caller,
        score: request.score,
        total_questions: request.total_questions,
        correct_answers: request.correct_answers,
    };
    let window_start = now
        .checked_sub(state.config().duplicate_play_window())
        .unwrap_or(SystemTime::UNIX_EPOCH);

    if let Some(existing) = store.find_recent_play(fingerprint, window_start).await? {
        info!(quiz_id = %request.quiz_id, "identical play within window; skipping insert");
        return Ok(RecordPlayResponse {
            play: existing.into(),
            duplicate: true,
        });
    }

    let play = QuizPlayEntity {
        id: Uuid::new_v4(),
        quiz_id: request.quiz_id,
        user_id: caller,
        score: request.score,
        total_questions: request.total_questions,
        correct_answers: request.correct_answers,
        played_at: now,
    };
    store.insert_play(play.clone()).await?;

    Ok(RecordPlayResponse {
        play: play.into(),
        duplicate: false,
    })
}

/// The caller's play history: the latest play per quiz, newest first.
pub async fn list_plays(
    state: &SharedState,
    caller: Uuid,
    limit: Option<usize>,
) -> Result<PlayHistoryResponse, ServiceError> {
    let store = state.require_room_store().await?;
    let plays = store.list_plays(caller).await?;

    let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let mut seen_quizzes = Vec::new();
    let mut unique = Vec::new();
    for play in plays {
        if seen_quizzes.contains(&play.quiz_id) {
            continue;
        }
        seen_quizzes.push(play.quiz_id);
        unique.push(play.into());
        if unique.len() == limit {
            break;
        }
    }

    Ok(PlayHistoryResponse { plays: unique })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig, dao::room_store::memory::MemoryRoomStore, state::AppState,
    };

    async fn test_state() -> SharedState {
        let state = AppState::new(AppConfig::default());
        state
            .set_room_store(Arc::new(MemoryRoomStore::new()))
            .await;
        state
    }

    fn request(quiz_id: Uuid, score: i32) -> RecordPlayRequest {
        RecordPlayRequest {
            quiz_id,
            score,
            total_questions: 3,
            correct_answers: 2,
        }
    }

    #[tokio::test]
    async fn identical_play_within_window_is_suppressed() {
        let state = test_state().await;
        let caller = Uuid::new_v4();
        let quiz_id = Uuid::new_v4();

        let first = record_play(&state, caller, request(quiz_id, 250))
            .await
            .unwrap();
        assert!(!first.duplicate);

        let second = record_play(&state, caller, request(quiz_id, 250))
            .await
            .unwrap();
        assert!(second.duplicate);
        assert_eq!(second.play.id, first.play.id);

        let history = list_plays(&state, caller, None).await.unwrap();
        assert_eq!(history.plays.len(), 1);
    }

    #[tokio::test]
    async fn different_score_is_a_new_play() {
        let state = test_state().await;
        let caller = Uuid::new_v4();
        let quiz_id = Uuid::new_v4();

        record_play(&state, caller, request(quiz_id, 250))
            .await
            .unwrap();
        let other = record_play(&state, caller, request(quiz_id, 300))
            .await
            .unwrap();
        assert!(!other.duplicate);
    }

    #[tokio::test]
    async fn history_keeps_latest_play_per_quiz() {
        let state = test_state().await;
        let caller = Uuid::new_v4();
        let quiz_id = Uuid::new_v4();

        record_play(&state, caller, request(quiz_id, 100))
            .await
            .unwrap();
        let latest = record_play(&state, caller, request(quiz_id, 300))
            .await
            .unwrap();
        record_play(&state, caller, request(Uuid::new_v4(), 200))
            .await
            .unwrap();

        let history = list_plays(&state, caller, None).await.unwrap();
        assert_eq!(history.plays.len(), 2);
        let for_quiz: Vec<_> = history
            .plays
            .iter()
            .filter(|play| play.quiz_id == quiz_id)
            .collect();
        assert_eq!(for_quiz.len(), 1);
        assert_eq!(for_quiz[0].id, latest.play.id);
    }

    #[tokio::test]
    async fn impossible_correct_count_is_rejected() {
        let state = test_state().await;
        let err = record_play(
            &state,
            Uuid::new_v4(),
            RecordPlayRequest {
                quiz_id: Uuid::new_v4(),
                score: 100,
                total_questions: 3,
                correct_answers: 4,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }
}
