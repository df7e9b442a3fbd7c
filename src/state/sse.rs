use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::dto::sse::ServerEvent;

/// Simple broadcast hub wrapper used by the SSE services.
pub struct SseHub {
    sender: broadcast::Sender<ServerEvent>,
}

impl SseHub {
    /// Construct a new hub backed by a Tokio broadcast channel with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new subscriber that will receive subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    /// Send an event to all current subscribers, ignoring delivery errors.
    pub fn broadcast(&self, event: ServerEvent) {
        let _ = self.sender.send(event);
    }

    /// Number of receivers currently attached to the hub.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Registry of per-room broadcast hubs.
///
/// The original design subscribed every client to table-level change
/// feeds filtered by room id; here each room gets one hub and all of its
/// participants share it. Hubs are created lazily on first subscription
/// and pruned once the last subscriber disconnects.
pub struct RoomChannels {
    hubs: DashMap<Uuid, SseHub>,
    capacity: usize,
}

impl RoomChannels {
    /// Build the registry with a per-hub channel capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            hubs: DashMap::new(),
            capacity,
        }
    }

    /// Subscribe to the hub of `room_id`, creating it when absent.
    pub fn subscribe(&self, room_id: Uuid) -> broadcast::Receiver<ServerEvent> {
        self.hubs
            .entry(room_id)
            .or_insert_with(|| SseHub::new(self.capacity))
            .subscribe()
    }

    /// Broadcast to the room's subscribers; a room without a hub has no
    /// listeners and the event is dropped.
    pub fn broadcast(&self, room_id: Uuid, event: ServerEvent) {
        if let Some(hub) = self.hubs.get(&room_id) {
            hub.broadcast(event);
        }
    }

    /// Drop the room's hub when nobody is listening anymore.
    pub fn prune(&self, room_id: Uuid) {
        self.hubs
            .remove_if(&room_id, |_, hub| hub.subscriber_count() == 0);
    }

    /// Number of rooms currently holding a live hub.
    pub fn active_rooms(&self) -> usize {
        self.hubs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(name: &str) -> ServerEvent {
        ServerEvent::new(Some(name.to_string()), "{}".to_string())
    }

    #[test]
    fn subscribers_of_one_room_share_events() {
        let channels = RoomChannels::new(8);
        let room_id = Uuid::new_v4();
        let mut first = channels.subscribe(room_id);
        let mut second = channels.subscribe(room_id);

        channels.broadcast(room_id, event("roster.changed"));

        assert_eq!(
            first.try_recv().unwrap().event.as_deref(),
            Some("roster.changed")
        );
        assert_eq!(
            second.try_recv().unwrap().event.as_deref(),
            Some("roster.changed")
        );
    }

    #[test]
    fn rooms_are_isolated() {
        let channels = RoomChannels::new(8);
        let left = Uuid::new_v4();
        let right = Uuid::new_v4();
        let mut listener = channels.subscribe(left);

        channels.broadcast(right, event("room.updated"));
        assert!(listener.try_recv().is_err());
    }

    #[test]
    fn prune_drops_idle_hubs_only() {
        let channels = RoomChannels::new(8);
        let room_id = Uuid::new_v4();
        let receiver = channels.subscribe(room_id);

        channels.prune(room_id);
        assert_eq!(channels.active_rooms(), 1);

        drop(receiver);
        channels.prune(room_id);
        assert_eq!(channels.active_rooms(), 0);
    }
}
