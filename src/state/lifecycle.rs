use thiserror::Error;

use crate::dao::models::RoomStatus;

/// Events that drive a room through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomEvent {
    /// Host starts the game from the lobby.
    StartGame,
    /// Host ends the game.
    FinishGame,
}

/// Error returned when an event cannot be applied to the current status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while {from}")]
pub struct InvalidTransition {
    /// Status the room was in when the invalid event was received.
    pub from: RoomStatus,
    /// Event that cannot be applied from this status.
    pub event: RoomEvent,
}

/// Compute the status a room moves to when `event` fires.
///
/// The status never moves backward and never leaves `finished`. Finishing
/// is allowed straight from the lobby, so an abandoned room can be closed
/// without ever playing.
pub fn apply(from: RoomStatus, event: RoomEvent) -> Result<RoomStatus, InvalidTransition> {
    match (from, event) {
        (RoomStatus::Waiting, RoomEvent::StartGame) => Ok(RoomStatus::Playing),
        (RoomStatus::Waiting, RoomEvent::FinishGame) => Ok(RoomStatus::Finished),
        (RoomStatus::Playing, RoomEvent::FinishGame) => Ok(RoomStatus::Finished),
        (from, event) => Err(InvalidTransition { from, event }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_through_game() {
        let playing = apply(RoomStatus::Waiting, RoomEvent::StartGame).unwrap();
        assert_eq!(playing, RoomStatus::Playing);
        let finished = apply(playing, RoomEvent::FinishGame).unwrap();
        assert_eq!(finished, RoomStatus::Finished);
    }

    #[test]
    fn finish_straight_from_lobby() {
        assert_eq!(
            apply(RoomStatus::Waiting, RoomEvent::FinishGame).unwrap(),
            RoomStatus::Finished
        );
    }

    #[test]
    fn playing_room_cannot_restart() {
        let err = apply(RoomStatus::Playing, RoomEvent::StartGame).unwrap_err();
        assert_eq!(err.from, RoomStatus::Playing);
        assert_eq!(err.event, RoomEvent::StartGame);
    }

    #[test]
    fn finished_room_never_moves_again() {
        assert!(apply(RoomStatus::Finished, RoomEvent::StartGame).is_err());
        assert!(apply(RoomStatus::Finished, RoomEvent::FinishGame).is_err());
    }
}
