use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::play::{PlayHistoryQuery, PlayHistoryResponse, RecordPlayRequest, RecordPlayResponse},
    error::AppError,
    extractors::CallerIdentity,
    services::play_service,
    state::SharedState,
};

/// Routes recording and listing quiz plays.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/plays", post(record_play))
        .route("/plays", get(play_history))
}

/// Record a finished quiz play; identical submissions within the
/// suppression window are deduplicated.
#[utoipa::path(
    post,
    path = "/plays",
    tag = "plays",
    request_body = RecordPlayRequest,
    responses(
        (status = 200, description = "Play recorded (or deduplicated)", body = RecordPlayResponse),
        (status = 400, description = "Inconsistent play payload")
    )
)]
pub async fn record_play(
    State(state): State<SharedState>,
    CallerIdentity(caller): CallerIdentity,
    Valid(Json(payload)): Valid<Json<RecordPlayRequest>>,
) -> Result<Json<RecordPlayResponse>, AppError> {
    let response = play_service::record_play(&state, caller, payload).await?;
    Ok(Json(response))
}

/// The caller's play history, latest play per quiz.
#[utoipa::path(
    get,
    path = "/plays",
    tag = "plays",
    params(PlayHistoryQuery),
    responses(
        (status = 200, description = "Play history", body = PlayHistoryResponse)
    )
)]
pub async fn play_history(
    State(state): State<SharedState>,
    CallerIdentity(caller): CallerIdentity,
    Query(query): Query<PlayHistoryQuery>,
) -> Result<Json<PlayHistoryResponse>, AppError> {
    let history = play_service::list_plays(&state, caller, query.limit).await?;
    Ok(Json(history))
}
