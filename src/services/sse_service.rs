use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::{
    dto::sse::{Handshake, ServerEvent},
    error::ServiceError,
    services::roster_service,
    state::SharedState,
};

/// Subscribe to the change feed of one room and build the handshake event.
///
/// The handshake carries a full room and roster snapshot so the new
/// subscriber starts from current state instead of waiting for the next
/// change.
pub async fn subscribe_room(
    state: &SharedState,
    room_id: Uuid,
) -> Result<(broadcast::Receiver<ServerEvent>, ServerEvent), ServiceError> {
    let store = state.require_room_store().await?;
    let Some(room) = store.find_room(room_id).await? else {
        return Err(ServiceError::NotFound(format!("room `{room_id}` not found")));
    };
    let players = store.list_players(room_id).await?;

    // Subscribe before snapshotting so a change landing in between is
    // delivered rather than lost.
    let receiver = state.room_events().subscribe(room_id);

    let handshake = Handshake {
        message: format!("subscribed to room {room_id}"),
        degraded: state.is_degraded(),
        all_ready: roster_service::all_ready(&players, state.config().ready_player_threshold()),
        room: room.into(),
        players: players.into_iter().map(Into::into).collect(),
    };
    let handshake = ServerEvent::json(Some("handshake".to_string()), &handshake)
        .map_err(|err| ServiceError::InvalidState(format!("handshake serialization: {err}")))?;

    Ok((receiver, handshake))
}

/// Convert a broadcast receiver into an SSE response, forwarding events and
/// cleaning up once the client disconnects.
pub fn to_sse_stream(
    state: SharedState,
    room_id: Uuid,
    mut receiver: broadcast::Receiver<ServerEvent>,
    handshake: ServerEvent,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    // forwarder task: emits the handshake, then reads from broadcast and
    // pushes into mpsc
    tokio::spawn(async move {
        if tx.send(Ok(to_axum_event(handshake))).await.is_ok() {
            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    recv_result = receiver.recv() => {
                        match recv_result {
                            Ok(payload) => {
                                if tx.send(Ok(to_axum_event(payload))).await.is_err() {
                                    break;
                                }
                            }
                            Err(RecvError::Closed) => break,
                            Err(RecvError::Lagged(_)) => {
                                // Skip lagged messages but keep the stream alive;
                                // the next roster event carries a full snapshot
                                // anyway.
                                continue;
                            }
                        }
                    }
                }
            }
        }

        // Own the receiver's drop before pruning so an idle hub can go away.
        drop(receiver);
        state.room_events().prune(room_id);
        tracing::info!(%room_id, "room SSE stream disconnected");
    });

    // response stream reads from mpsc; when client disconnects axum drops this stream
    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

fn to_axum_event(payload: ServerEvent) -> Event {
    let mut event = Event::default().data(payload.data);
    if let Some(name) = payload.event {
        event = event.event(name);
    }
    event
}
