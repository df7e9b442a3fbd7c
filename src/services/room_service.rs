use std::{sync::Arc, time::SystemTime};

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dao::{
        models::{PlayerEntity, RoomEntity, RoomStatus},
        room_store::RoomStore,
    },
    dto::{
        common::RoomSnapshot,
        room::{CreateRoomRequest, CreateRoomResponse, JoinRoomRequest, JoinRoomResponse},
    },
    error::ServiceError,
    services::{room_codes, sse_events},
    state::{SharedState, lifecycle, lifecycle::RoomEvent},
};

const FALLBACK_HOST_NICKNAME: &str = "Host";
const CODE_ALLOCATION_ATTEMPTS: usize = 8;

/// Create a room in the waiting state and seat the host.
///
/// The host seat is inserted after the room; when that insert fails the
/// room is still considered created and the failure is only logged. The
/// host gains a row the moment they re-enter through [`join_room`].
pub async fn create_room(
    state: &SharedState,
    caller: Uuid,
    request: CreateRoomRequest,
) -> Result<CreateRoomResponse, ServiceError> {
    let store = state.require_room_store().await?;

    let room_code = match request.room_code {
        Some(code) => {
            let code = room_codes::normalize_code(&code);
            if store
                .find_waiting_room_by_code(code.clone())
                .await?
                .is_some()
            {
                return Err(ServiceError::Conflict(format!(
                    "room code `{code}` is already in use"
                )));
            }
            code
        }
        None => reserve_generated_code(store.as_ref(), state.config()).await?,
    };

    let room = RoomEntity {
        id: Uuid::new_v4(),
        quiz_id: request.quiz_id,
        host_id: caller,
        created_by: caller,
        room_code,
        status: RoomStatus::Waiting,
        created_at: SystemTime::now(),
        started_at: None,
        finished_at: None,
        game_started_at: None,
        game_redirect_url: None,
        host_nickname: request.host_nickname,
    };
    store.insert_room(room.clone()).await?;

    let host_player = PlayerEntity {
        id: Uuid::new_v4(),
        room_id: room.id,
        user_id: caller,
        nickname: room
            .host_nickname
            .clone()
            .unwrap_or_else(|| FALLBACK_HOST_NICKNAME.to_string()),
        score: 0,
        joined_at: SystemTime::now(),
        is_ready: false,
        quiz_completed: false,
        completed_at: None,
    };

    let player = match store.upsert_player(host_player.clone()).await {
        Ok(()) => Some(host_player),
        Err(err) => {
            // Lenient on purpose: the room stays up and the host can still
            // claim a seat by joining with the room code.
            warn!(
                room_id = %room.id,
                error = %err,
                "host seat insert failed; room kept without a host row"
            );
            None
        }
    };

    info!(room_id = %room.id, room_code = %room.room_code, "room created");
    Ok(CreateRoomResponse {
        room: room.into(),
        player: player.map(Into::into),
    })
}

/// Fetch a room by id.
pub async fn fetch_room(state: &SharedState, room_id: Uuid) -> Result<RoomSnapshot, ServiceError> {
    let store = state.require_room_store().await?;
    let Some(room) = store.find_room(room_id).await? else {
        return Err(ServiceError::NotFound(format!("room `{room_id}` not found")));
    };
    Ok(room.into())
}

/// Join a waiting room by code.
///
/// The response always carries the caller's own player row, so clients
/// never re-derive their identity from a later roster refresh. Rejoining
/// updates the nickname only; readiness, score, and completion survive.
pub async fn join_room(
    state: &SharedState,
    caller: Uuid,
    request: JoinRoomRequest,
) -> Result<JoinRoomResponse, ServiceError> {
    let store = state.require_room_store().await?;

    let code = room_codes::normalize_code(&request.room_code);
    let Some(room) = store.find_waiting_room_by_code(code).await? else {
        return Err(ServiceError::NotFound(
            "room not found or not joinable".into(),
        ));
    };

    let existing = store.find_player(room.id, caller).await?;
    let is_host = room.host_id == caller;

    let player = match (is_host, existing) {
        // The host already holds a seat; entering the lobby again changes nothing.
        (true, Some(player)) => player,
        // Rare path: the seat insert at creation time failed. The host is
        // assumed ready on this path, unlike a fresh guest.
        (true, None) => {
            let player = PlayerEntity {
                id: Uuid::new_v4(),
                room_id: room.id,
                user_id: caller,
                nickname: room
                    .host_nickname
                    .clone()
                    .unwrap_or_else(|| FALLBACK_HOST_NICKNAME.to_string()),
                score: 0,
                joined_at: SystemTime::now(),
                is_ready: true,
                quiz_completed: false,
                completed_at: None,
            };
            store.upsert_player(player.clone()).await?;
            player
        }
        (false, Some(mut player)) => {
            player.nickname = request.nickname;
            store.upsert_player(player.clone()).await?;
            player
        }
        (false, None) => {
            let player = PlayerEntity {
                id: Uuid::new_v4(),
                room_id: room.id,
                user_id: caller,
                nickname: request.nickname,
                score: 0,
                joined_at: SystemTime::now(),
                is_ready: false,
                quiz_completed: false,
                completed_at: None,
            };
            store.upsert_player(player.clone()).await?;
            player
        }
    };

    let players = store.list_players(room.id).await?;
    sse_events::broadcast_roster_changed(state, room.id, &players);

    Ok(JoinRoomResponse {
        room: room.into(),
        player: player.into(),
    })
}

/// Start the game. Host only, lobby only.
///
/// Status, timestamps, and the redirect URL land in one room write and one
/// broadcast, so no subscriber ever observes a playing room without a
/// destination.
pub async fn start_game(
    state: &SharedState,
    caller: Uuid,
    room_id: Uuid,
) -> Result<RoomSnapshot, ServiceError> {
    let store = state.require_room_store().await?;
    let Some(mut room) = store.find_room(room_id).await? else {
        return Err(ServiceError::NotFound(format!("room `{room_id}` not found")));
    };

    ensure_host(&room, caller, "start")?;
    room.status = lifecycle::apply(room.status, RoomEvent::StartGame)?;

    let now = SystemTime::now();
    room.started_at = Some(now);
    room.game_started_at = Some(now);
    room.game_redirect_url = Some(format!("/quiz/{}?room={}", room.quiz_id, room.id));
    store.update_room(room.clone()).await?;

    sse_events::broadcast_room_started(state, &room);
    info!(room_id = %room.id, "game started");
    Ok(room.into())
}

/// Finish the game. Host only; valid from the lobby or from play.
pub async fn finish_game(
    state: &SharedState,
    caller: Uuid,
    room_id: Uuid,
) -> Result<RoomSnapshot, ServiceError> {
    let store = state.require_room_store().await?;
    let Some(mut room) = store.find_room(room_id).await? else {
        return Err(ServiceError::NotFound(format!("room `{room_id}` not found")));
    };

    ensure_host(&room, caller, "finish")?;
    room.status = lifecycle::apply(room.status, RoomEvent::FinishGame)?;
    room.finished_at = Some(SystemTime::now());
    store.update_room(room.clone()).await?;

    sse_events::broadcast_room_finished(state, &room);
    info!(room_id = %room.id, "game finished");
    Ok(room.into())
}

fn ensure_host(room: &RoomEntity, caller: Uuid, action: &str) -> Result<(), ServiceError> {
    if room.host_id != caller {
        return Err(ServiceError::Forbidden(format!(
            "only the host can {action} the game"
        )));
    }
    Ok(())
}

async fn reserve_generated_code(
    store: &dyn RoomStore,
    config: &AppConfig,
) -> Result<String, ServiceError> {
    for _ in 0..CODE_ALLOCATION_ATTEMPTS {
        let code = room_codes::generate_code(config);
        if store
            .find_waiting_room_by_code(code.clone())
            .await?
            .is_none()
        {
            return Ok(code);
        }
    }
    Err(ServiceError::Conflict(
        "could not allocate a unique room code".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dao::room_store::memory::MemoryRoomStore,
        services::{leaderboard_service, roster_service},
        state::AppState,
    };

    async fn test_state() -> SharedState {
        let state = AppState::new(AppConfig::default());
        state
            .set_room_store(Arc::new(MemoryRoomStore::new()))
            .await;
        state
    }

    fn create_request(code: Option<&str>) -> CreateRoomRequest {
        CreateRoomRequest {
            quiz_id: Uuid::new_v4(),
            room_code: code.map(str::to_string),
            host_nickname: Some("Quiz Master".to_string()),
        }
    }

    fn join_request(code: &str, nickname: &str) -> JoinRoomRequest {
        JoinRoomRequest {
            room_code: code.to_string(),
            nickname: nickname.to_string(),
        }
    }

    #[tokio::test]
    async fn create_room_seats_the_host_unready() {
        let state = test_state().await;
        let host = Uuid::new_v4();

        let created = create_room(&state, host, create_request(Some("AB12CD")))
            .await
            .unwrap();

        assert_eq!(created.room.status, RoomStatus::Waiting);
        assert_eq!(created.room.room_code, "AB12CD");
        let player = created.player.expect("host seat");
        assert_eq!(player.user_id, host);
        assert_eq!(player.score, 0);
        assert!(!player.is_ready);
        assert_eq!(player.nickname, "Quiz Master");
    }

    #[tokio::test]
    async fn create_room_generates_code_when_omitted() {
        let state = test_state().await;
        let created = create_room(&state, Uuid::new_v4(), create_request(None))
            .await
            .unwrap();
        assert_eq!(
            created.room.room_code.len(),
            state.config().code_length()
        );
    }

    #[tokio::test]
    async fn duplicate_code_among_waiting_rooms_conflicts() {
        let state = test_state().await;
        create_room(&state, Uuid::new_v4(), create_request(Some("AB12CD")))
            .await
            .unwrap();

        let err = create_room(&state, Uuid::new_v4(), create_request(Some("ab12cd")))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn join_twice_updates_nickname_but_keeps_progress() {
        let state = test_state().await;
        let host = Uuid::new_v4();
        let guest = Uuid::new_v4();
        let created = create_room(&state, host, create_request(Some("AB12CD")))
            .await
            .unwrap();

        let first = join_room(&state, guest, join_request("AB12CD", "Ana"))
            .await
            .unwrap();
        roster_service::set_ready(&state, guest, created.room.id, true)
            .await
            .unwrap();

        let second = join_room(&state, guest, join_request("ab12cd", "Ana Maria"))
            .await
            .unwrap();

        // Same row, new nickname, readiness preserved.
        assert_eq!(second.player.id, first.player.id);
        assert_eq!(second.player.nickname, "Ana Maria");
        assert!(second.player.is_ready);

        let roster = roster_service::fetch_roster(&state, created.room.id)
            .await
            .unwrap();
        assert_eq!(roster.players.len(), 2);
    }

    #[tokio::test]
    async fn host_rejoin_reuses_existing_seat() {
        let state = test_state().await;
        let host = Uuid::new_v4();
        let created = create_room(&state, host, create_request(Some("AB12CD")))
            .await
            .unwrap();

        let rejoined = join_room(&state, host, join_request("AB12CD", "ignored"))
            .await
            .unwrap();
        assert_eq!(rejoined.player.id, created.player.unwrap().id);
        // The seat from creation is untouched, including its nickname.
        assert_eq!(rejoined.player.nickname, "Quiz Master");
        assert!(!rejoined.player.is_ready);
    }

    #[tokio::test]
    async fn join_unknown_code_is_not_found() {
        let state = test_state().await;
        let err = join_room(&state, Uuid::new_v4(), join_request("ZZZZZZ", "Ana"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn started_room_is_no_longer_joinable() {
        let state = test_state().await;
        let host = Uuid::new_v4();
        let created = create_room(&state, host, create_request(Some("AB12CD")))
            .await
            .unwrap();
        start_game(&state, host, created.room.id).await.unwrap();

        let err = join_room(&state, Uuid::new_v4(), join_request("AB12CD", "Ana"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn only_the_host_starts_or_finishes() {
        let state = test_state().await;
        let host = Uuid::new_v4();
        let guest = Uuid::new_v4();
        let created = create_room(&state, host, create_request(Some("AB12CD")))
            .await
            .unwrap();
        join_room(&state, guest, join_request("AB12CD", "Ana"))
            .await
            .unwrap();

        let err = start_game(&state, guest, created.room.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        let err = finish_game(&state, guest, created.room.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn start_writes_status_and_redirect_together() {
        let state = test_state().await;
        let host = Uuid::new_v4();
        let created = create_room(&state, host, create_request(Some("AB12CD")))
            .await
            .unwrap();

        let started = start_game(&state, host, created.room.id).await.unwrap();
        assert_eq!(started.status, RoomStatus::Playing);
        assert_eq!(
            started.game_redirect_url.as_deref(),
            Some(
                format!("/quiz/{}?room={}", created.room.quiz_id, created.room.id).as_str()
            )
        );
        assert!(started.started_at.is_some());
        assert!(started.game_started_at.is_some());
    }

    #[tokio::test]
    async fn status_never_moves_backward() {
        let state = test_state().await;
        let host = Uuid::new_v4();
        let created = create_room(&state, host, create_request(Some("AB12CD")))
            .await
            .unwrap();

        start_game(&state, host, created.room.id).await.unwrap();
        assert!(matches!(
            start_game(&state, host, created.room.id).await.unwrap_err(),
            ServiceError::InvalidState(_)
        ));

        finish_game(&state, host, created.room.id).await.unwrap();
        assert!(matches!(
            start_game(&state, host, created.room.id).await.unwrap_err(),
            ServiceError::InvalidState(_)
        ));
        assert!(matches!(
            finish_game(&state, host, created.room.id).await.unwrap_err(),
            ServiceError::InvalidState(_)
        ));
    }

    #[tokio::test]
    async fn abandoned_lobby_can_be_finished_without_playing() {
        let state = test_state().await;
        let host = Uuid::new_v4();
        let created = create_room(&state, host, create_request(Some("AB12CD")))
            .await
            .unwrap();

        let finished = finish_game(&state, host, created.room.id).await.unwrap();
        assert_eq!(finished.status, RoomStatus::Finished);
        assert!(finished.finished_at.is_some());
    }

    #[tokio::test]
    async fn create_and_play_full_scenario() {
        let state = test_state().await;
        let host = Uuid::new_v4();
        let guest = Uuid::new_v4();

        // Host creates a room for a three-question quiz.
        let created = create_room(&state, host, create_request(Some("AB12CD")))
            .await
            .unwrap();
        let room_id = created.room.id;
        assert_eq!(created.room.status, RoomStatus::Waiting);

        // Host readies up; Ana joins.
        roster_service::set_ready(&state, host, room_id, true)
            .await
            .unwrap();
        join_room(&state, guest, join_request("AB12CD", "Ana"))
            .await
            .unwrap();
        let roster = roster_service::fetch_roster(&state, room_id).await.unwrap();
        assert_eq!(roster.players.len(), 2);
        // Ana has not readied up yet, so the advisory flag stays false.
        assert!(!roster.all_ready);

        // Host starts the game anyway; the gate is advisory.
        let started = start_game(&state, host, room_id).await.unwrap();
        assert_eq!(started.status, RoomStatus::Playing);
        assert!(started.game_redirect_url.is_some());

        // Both players finish with their own scores.
        roster_service::mark_completed(&state, host, room_id, 200)
            .await
            .unwrap();
        let ana = roster_service::mark_completed(&state, guest, room_id, 250)
            .await
            .unwrap();
        assert!(ana.quiz_completed);
        assert!(ana.completed_at.is_some());

        // Leaderboard ranks Ana first; 250 of 300 rounds to 83 percent.
        let board = leaderboard_service::leaderboard(&state, room_id, 3)
            .await
            .unwrap();
        assert_eq!(board.entries[0].nickname, "Ana");
        assert_eq!(board.entries[0].percentage, 83);
        assert_eq!(board.entries[1].score, 200);
    }
}
