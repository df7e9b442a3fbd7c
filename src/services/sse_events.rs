use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::{
    dao::models::{PlayerEntity, RoomEntity},
    dto::sse::{RoomChangedEvent, RosterChangedEvent, ServerEvent},
    services::roster_service,
    state::SharedState,
};

const EVENT_ROSTER_CHANGED: &str = "roster.changed";
const EVENT_ROOM_UPDATED: &str = "room.updated";
const EVENT_ROOM_STARTED: &str = "room.started";
const EVENT_ROOM_FINISHED: &str = "room.finished";

/// Broadcast the full re-fetched roster of a room after any membership change.
pub fn broadcast_roster_changed(state: &SharedState, room_id: Uuid, players: &[PlayerEntity]) {
    let payload = RosterChangedEvent {
        players: players.iter().cloned().map(Into::into).collect(),
        all_ready: roster_service::all_ready(players, state.config().ready_player_threshold()),
    };
    send_room_event(state, room_id, EVENT_ROSTER_CHANGED, &payload);
}

/// Broadcast a plain room row change.
pub fn broadcast_room_updated(state: &SharedState, room: &RoomEntity) {
    send_room_snapshot(state, room, EVENT_ROOM_UPDATED);
}

/// Broadcast the start transition.
///
/// The payload carries status and redirect URL together; subscribers act
/// on this single event instead of stitching two separate pushes.
pub fn broadcast_room_started(state: &SharedState, room: &RoomEntity) {
    send_room_snapshot(state, room, EVENT_ROOM_STARTED);
}

/// Broadcast the finish transition.
pub fn broadcast_room_finished(state: &SharedState, room: &RoomEntity) {
    send_room_snapshot(state, room, EVENT_ROOM_FINISHED);
}

fn send_room_snapshot(state: &SharedState, room: &RoomEntity, event: &str) {
    let payload = RoomChangedEvent {
        room: room.clone().into(),
    };
    send_room_event(state, room.id, event, &payload);
}

fn send_room_event(state: &SharedState, room_id: Uuid, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.room_events().broadcast(room_id, event),
        Err(err) => warn!(event, error = %err, "failed to serialize room SSE payload"),
    }
}
