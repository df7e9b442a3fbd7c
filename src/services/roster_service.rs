use std::time::SystemTime;

use uuid::Uuid;

use crate::{
    dao::models::PlayerEntity,
    dto::{common::PlayerSummary, roster::RosterResponse},
    error::ServiceError,
    services::sse_events,
    state::SharedState,
};

/// Fetch the roster of a room in seating order.
pub async fn fetch_roster(
    state: &SharedState,
    room_id: Uuid,
) -> Result<RosterResponse, ServiceError> {
    let store = state.require_room_store().await?;
    if store.find_room(room_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!("room `{room_id}` not found")));
    }

    let players = store.list_players(room_id).await?;
    Ok(roster_response(state, players))
}

/// Set the caller's readiness flag. Last write wins.
pub async fn set_ready(
    state: &SharedState,
    caller: Uuid,
    room_id: Uuid,
    ready: bool,
) -> Result<RosterResponse, ServiceError> {
    let store = state.require_room_store().await?;
    let Some(mut player) = store.find_player(room_id, caller).await? else {
        return Err(ServiceError::NotFound(format!(
            "no player row for caller in room `{room_id}`"
        )));
    };

    player.is_ready = ready;
    store.upsert_player(player).await?;

    let players = store.list_players(room_id).await?;
    sse_events::broadcast_roster_changed(state, room_id, &players);
    Ok(roster_response(state, players))
}

/// Record the caller's quiz completion and final score.
///
/// Overwriting an already-completed row is allowed and harmless; the
/// completion flag never flips back and the first completion timestamp is
/// kept.
pub async fn mark_completed(
    state: &SharedState,
    caller: Uuid,
    room_id: Uuid,
    score: i32,
) -> Result<PlayerSummary, ServiceError> {
    let store = state.require_room_store().await?;
    let Some(mut player) = store.find_player(room_id, caller).await? else {
        return Err(ServiceError::NotFound(format!(
            "no player row for caller in room `{room_id}`"
        )));
    };

    player.score = score;
    player.quiz_completed = true;
    player.completed_at = player.completed_at.or_else(|| Some(SystemTime::now()));
    store.upsert_player(player.clone()).await?;

    let players = store.list_players(room_id).await?;
    sse_events::broadcast_roster_changed(state, room_id, &players);
    Ok(player.into())
}

/// Remove a player from the room.
///
/// With `player_id` the named row is removed after an ownership check;
/// without it the caller's own row is looked up and removed. The room
/// itself is left untouched even when this was the last player.
pub async fn leave_room(
    state: &SharedState,
    caller: Uuid,
    room_id: Uuid,
    player_id: Option<Uuid>,
) -> Result<(), ServiceError> {
    let store = state.require_room_store().await?;

    let player = match player_id {
        Some(player_id) => {
            let Some(player) = store.find_player_by_id(room_id, player_id).await? else {
                return Err(ServiceError::NotFound(format!(
                    "player `{player_id}` not found in room `{room_id}`"
                )));
            };
            if player.user_id != caller {
                return Err(ServiceError::Forbidden(
                    "players can only remove their own row".into(),
                ));
            }
            player
        }
        None => {
            let Some(player) = store.find_player(room_id, caller).await? else {
                return Err(ServiceError::NotFound(format!(
                    "no player row for caller in room `{room_id}`"
                )));
            };
            player
        }
    };

    store.delete_player(room_id, player.id).await?;

    let players = store.list_players(room_id).await?;
    sse_events::broadcast_roster_changed(state, room_id, &players);
    Ok(())
}

/// Advisory lobby predicate: enough players and every one of them ready.
pub fn all_ready(players: &[PlayerEntity], threshold: usize) -> bool {
    players.len() >= threshold && players.iter().all(|player| player.is_ready)
}

fn roster_response(state: &SharedState, players: Vec<PlayerEntity>) -> RosterResponse {
    let all_ready = all_ready(&players, state.config().ready_player_threshold());
    RosterResponse {
        players: players.into_iter().map(Into::into).collect(),
        all_ready,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(ready: bool) -> PlayerEntity {
        PlayerEntity {
            id: Uuid::new_v4(),
            room_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            nickname: "p".to_string(),
            score: 0,
            joined_at: SystemTime::now(),
            is_ready: ready,
            quiz_completed: false,
            completed_at: None,
        }
    }

    #[test]
    fn all_ready_needs_threshold_players() {
        let players = vec![player(true)];
        assert!(!all_ready(&players, 2));
        assert!(all_ready(&players, 1));
    }

    #[test]
    fn all_ready_needs_everyone_ready() {
        let players = vec![player(true), player(false)];
        assert!(!all_ready(&players, 2));

        let players = vec![player(true), player(true)];
        assert!(all_ready(&players, 2));
    }

    #[test]
    fn empty_roster_is_never_ready() {
        assert!(!all_ready(&[], 2));
    }
}
