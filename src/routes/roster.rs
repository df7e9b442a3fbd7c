use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        common::PlayerSummary,
        roster::{CompleteQuizRequest, LeaveRoomQuery, ReadyRequest, RosterResponse},
    },
    error::AppError,
    extractors::CallerIdentity,
    services::roster_service,
    state::SharedState,
};

/// Routes handling roster membership and per-player updates.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/rooms/{id}/players", get(fetch_roster))
        .route("/rooms/{id}/players", delete(leave_room))
        .route("/rooms/{id}/players/ready", put(set_ready))
        .route("/rooms/{id}/players/complete", post(complete_quiz))
}

/// List the players of a room in seating order.
#[utoipa::path(
    get,
    path = "/rooms/{id}/players",
    tag = "roster",
    params(("id" = Uuid, Path, description = "Identifier of the room")),
    responses(
        (status = 200, description = "Current roster", body = RosterResponse),
        (status = 404, description = "Room not found")
    )
)]
pub async fn fetch_roster(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RosterResponse>, AppError> {
    let roster = roster_service::fetch_roster(&state, id).await?;
    Ok(Json(roster))
}

/// Toggle the caller's readiness in the lobby.
#[utoipa::path(
    put,
    path = "/rooms/{id}/players/ready",
    tag = "roster",
    params(("id" = Uuid, Path, description = "Identifier of the room")),
    request_body = ReadyRequest,
    responses(
        (status = 200, description = "Roster after the toggle", body = RosterResponse),
        (status = 404, description = "Caller has no seat in this room")
    )
)]
pub async fn set_ready(
    State(state): State<SharedState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<ReadyRequest>>,
) -> Result<Json<RosterResponse>, AppError> {
    let roster = roster_service::set_ready(&state, caller, id, payload.ready).await?;
    Ok(Json(roster))
}

/// Record the caller's completion and final score.
#[utoipa::path(
    post,
    path = "/rooms/{id}/players/complete",
    tag = "roster",
    params(("id" = Uuid, Path, description = "Identifier of the room")),
    request_body = CompleteQuizRequest,
    responses(
        (status = 200, description = "Updated player row", body = PlayerSummary),
        (status = 404, description = "Caller has no seat in this room")
    )
)]
pub async fn complete_quiz(
    State(state): State<SharedState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<CompleteQuizRequest>>,
) -> Result<Json<PlayerSummary>, AppError> {
    let player = roster_service::mark_completed(&state, caller, id, payload.score).await?;
    Ok(Json(player))
}

/// Leave a room, removing the caller's (or the named) player row.
#[utoipa::path(
    delete,
    path = "/rooms/{id}/players",
    tag = "roster",
    params(
        ("id" = Uuid, Path, description = "Identifier of the room"),
        LeaveRoomQuery
    ),
    responses(
        (status = 204, description = "Player removed"),
        (status = 403, description = "Row belongs to another player"),
        (status = 404, description = "No matching player row")
    )
)]
pub async fn leave_room(
    State(state): State<SharedState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<Uuid>,
    Query(query): Query<LeaveRoomQuery>,
) -> Result<StatusCode, AppError> {
    roster_service::leave_room(&state, caller, id, query.player_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
