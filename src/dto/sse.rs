use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::common::{PlayerSummary, RoomSnapshot};

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    /// Optional SSE event name.
    pub event: Option<String>,
    /// Serialized data field.
    pub data: String,
}

impl ServerEvent {
    /// Build an event with a preserialized data payload.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
///
/// Carries a full snapshot so a late subscriber reconciles pushes it
/// missed before connecting.
pub struct Handshake {
    /// Human-readable message confirming the subscription.
    pub message: String,
    /// Whether the backend is running without a storage backend connection.
    pub degraded: bool,
    /// Current room state.
    pub room: RoomSnapshot,
    /// Current roster in seating order.
    pub players: Vec<PlayerSummary>,
    /// Advisory all-ready flag for the lobby.
    pub all_ready: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast whenever the roster of a room changes.
///
/// Carries the full re-fetched roster rather than a row diff: applying a
/// complete snapshot is idempotent no matter how events are reordered.
pub struct RosterChangedEvent {
    /// Players ordered by join time ascending.
    pub players: Vec<PlayerSummary>,
    /// Advisory all-ready flag for the lobby.
    pub all_ready: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast whenever a room row changes.
///
/// The start transition emits this with `status` and `game_redirect_url`
/// populated in the same payload, so subscribers never observe a playing
/// room without a destination.
pub struct RoomChangedEvent {
    /// Full room snapshot after the change.
    pub room: RoomSnapshot,
}
