use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        common::RoomSnapshot,
        room::{CreateRoomRequest, CreateRoomResponse, JoinRoomRequest, JoinRoomResponse},
    },
    error::AppError,
    extractors::CallerIdentity,
    services::room_service,
    state::SharedState,
};

/// Routes handling the room lifecycle (create, resolve, start, finish).
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/rooms", post(create_room))
        .route("/rooms/join", post(join_room))
        .route("/rooms/{id}", get(fetch_room))
        .route("/rooms/{id}/start", post(start_game))
        .route("/rooms/{id}/finish", post(finish_game))
}

/// Create a room bound to a quiz and seat the caller as host.
#[utoipa::path(
    post,
    path = "/rooms",
    tag = "rooms",
    request_body = CreateRoomRequest,
    responses(
        (status = 200, description = "Room created", body = CreateRoomResponse),
        (status = 409, description = "Room code already in use")
    )
)]
pub async fn create_room(
    State(state): State<SharedState>,
    CallerIdentity(caller): CallerIdentity,
    Valid(Json(payload)): Valid<Json<CreateRoomRequest>>,
) -> Result<Json<CreateRoomResponse>, AppError> {
    let response = room_service::create_room(&state, caller, payload).await?;
    Ok(Json(response))
}

/// Join a waiting room by its code.
#[utoipa::path(
    post,
    path = "/rooms/join",
    tag = "rooms",
    request_body = JoinRoomRequest,
    responses(
        (status = 200, description = "Joined the room", body = JoinRoomResponse),
        (status = 404, description = "Room not found or not joinable")
    )
)]
pub async fn join_room(
    State(state): State<SharedState>,
    CallerIdentity(caller): CallerIdentity,
    Valid(Json(payload)): Valid<Json<JoinRoomRequest>>,
) -> Result<Json<JoinRoomResponse>, AppError> {
    let response = room_service::join_room(&state, caller, payload).await?;
    Ok(Json(response))
}

/// Fetch a room by id.
#[utoipa::path(
    get,
    path = "/rooms/{id}",
    tag = "rooms",
    params(("id" = Uuid, Path, description = "Identifier of the room")),
    responses(
        (status = 200, description = "Room found", body = RoomSnapshot),
        (status = 404, description = "Room not found")
    )
)]
pub async fn fetch_room(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoomSnapshot>, AppError> {
    let snapshot = room_service::fetch_room(&state, id).await?;
    Ok(Json(snapshot))
}

/// Start the game. Host only; writes status and redirect URL atomically.
#[utoipa::path(
    post,
    path = "/rooms/{id}/start",
    tag = "rooms",
    params(("id" = Uuid, Path, description = "Identifier of the room")),
    responses(
        (status = 200, description = "Game started", body = RoomSnapshot),
        (status = 403, description = "Caller is not the host"),
        (status = 409, description = "Room is not in the lobby")
    )
)]
pub async fn start_game(
    State(state): State<SharedState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<RoomSnapshot>, AppError> {
    let snapshot = room_service::start_game(&state, caller, id).await?;
    Ok(Json(snapshot))
}

/// Finish the game. Host only.
#[utoipa::path(
    post,
    path = "/rooms/{id}/finish",
    tag = "rooms",
    params(("id" = Uuid, Path, description = "Identifier of the room")),
    responses(
        (status = 200, description = "Game finished", body = RoomSnapshot),
        (status = 403, description = "Caller is not the host"),
        (status = 409, description = "Room already finished")
    )
)]
pub async fn finish_game(
    State(state): State<SharedState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<RoomSnapshot>, AppError> {
    let snapshot = room_service::finish_game(&state, caller, id).await?;
    Ok(Json(snapshot))
}
