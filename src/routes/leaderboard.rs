use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::leaderboard::{LeaderboardQuery, LeaderboardResponse},
    error::AppError,
    services::leaderboard_service,
    state::SharedState,
};

/// Routes exposing the live leaderboard projection.
pub fn router() -> Router<SharedState> {
    Router::new().route("/rooms/{id}/leaderboard", get(leaderboard))
}

/// Return the room's leaderboard, ranked by score descending.
#[utoipa::path(
    get,
    path = "/rooms/{id}/leaderboard",
    tag = "leaderboard",
    params(
        ("id" = Uuid, Path, description = "Identifier of the room"),
        LeaderboardQuery
    ),
    responses(
        (status = 200, description = "Live leaderboard", body = LeaderboardResponse),
        (status = 404, description = "Room not found")
    )
)]
pub async fn leaderboard(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let total_questions = query.total_questions.unwrap_or(0);
    let board = leaderboard_service::leaderboard(&state, id, total_questions).await?;
    Ok(Json(board))
}
