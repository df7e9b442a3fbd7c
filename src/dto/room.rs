use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::dto::{
    common::{PlayerSummary, RoomSnapshot},
    validation::{validate_nickname, validate_room_code},
};

/// Payload used to create a new room bound to a quiz.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRoomRequest {
    /// Quiz the room will play; owned by an external quiz service.
    pub quiz_id: Uuid,
    /// Join code to reserve. Generated by the server when omitted.
    #[serde(default)]
    pub room_code: Option<String>,
    /// Display name of the host in the lobby.
    #[serde(default)]
    pub host_nickname: Option<String>,
}

impl Validate for CreateRoomRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(ref code) = self.room_code {
            if let Err(e) = validate_room_code(code) {
                errors.add("room_code", e);
            }
        }

        if let Some(ref nickname) = self.host_nickname {
            if let Err(e) = validate_nickname(nickname) {
                errors.add("host_nickname", e);
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Payload used to join an existing room by code.
#[derive(Debug, Deserialize, ToSchema)]
pub struct JoinRoomRequest {
    /// Join code as typed by the player; matched case-insensitively.
    pub room_code: String,
    /// Display name for this player. A rejoin updates the nickname only.
    pub nickname: String,
}

impl Validate for JoinRoomRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_room_code(&self.room_code) {
            errors.add("room_code", e);
        }

        if let Err(e) = validate_nickname(&self.nickname) {
            errors.add("nickname", e);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Response returned once a room has been created.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateRoomResponse {
    /// The created room.
    pub room: RoomSnapshot,
    /// The host's own player row. Absent when the seat insert failed;
    /// the room is still considered created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerSummary>,
}

/// Response returned after joining a room.
///
/// Always carries the caller's own player row, so clients never have to
/// re-derive "which row is mine" from a roster refresh.
#[derive(Debug, Serialize, ToSchema)]
pub struct JoinRoomResponse {
    /// The joined room.
    pub room: RoomSnapshot,
    /// The caller's player row.
    pub player: PlayerSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_request_rejects_bad_code_and_blank_nickname() {
        let request = JoinRoomRequest {
            room_code: "a!".to_string(),
            nickname: "   ".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("room_code"));
        assert!(errors.field_errors().contains_key("nickname"));
    }

    #[test]
    fn create_request_without_code_is_valid() {
        let request = CreateRoomRequest {
            quiz_id: Uuid::new_v4(),
            room_code: None,
            host_nickname: None,
        };
        assert!(request.validate().is_ok());
    }
}
