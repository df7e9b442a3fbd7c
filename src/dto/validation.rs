//! Validation helpers for DTOs.

use validator::ValidationError;

const ROOM_CODE_MIN: usize = 4;
const ROOM_CODE_MAX: usize = 12;
const NICKNAME_MAX: usize = 32;

/// Validates that a room code is 4 to 12 ASCII alphanumeric characters.
///
/// Case is not checked here; join and create flows upcase the code before
/// touching storage, mirroring how players type codes from a shared screen.
pub fn validate_room_code(code: &str) -> Result<(), ValidationError> {
    if code.len() < ROOM_CODE_MIN || code.len() > ROOM_CODE_MAX {
        let mut err = ValidationError::new("room_code_length");
        err.message = Some(
            format!(
                "Room code must be {} to {} characters (got {})",
                ROOM_CODE_MIN,
                ROOM_CODE_MAX,
                code.len()
            )
            .into(),
        );
        return Err(err);
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        let mut err = ValidationError::new("room_code_format");
        err.message = Some("Room code must contain only letters and digits".into());
        return Err(err);
    }

    Ok(())
}

/// Validates that a nickname is non-blank and at most 32 characters.
pub fn validate_nickname(nickname: &str) -> Result<(), ValidationError> {
    if nickname.trim().is_empty() {
        let mut err = ValidationError::new("nickname_blank");
        err.message = Some("Nickname must not be blank".into());
        return Err(err);
    }

    if nickname.chars().count() > NICKNAME_MAX {
        let mut err = ValidationError::new("nickname_length");
        err.message = Some(format!("Nickname must be at most {NICKNAME_MAX} characters").into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_room_code_valid() {
        assert!(validate_room_code("AB12CD").is_ok());
        assert!(validate_room_code("ab12cd").is_ok());
        assert!(validate_room_code("ROOM").is_ok());
        assert!(validate_room_code("123456789012").is_ok());
    }

    #[test]
    fn test_validate_room_code_invalid_length() {
        assert!(validate_room_code("AB1").is_err()); // too short
        assert!(validate_room_code("1234567890123").is_err()); // too long
        assert!(validate_room_code("").is_err()); // empty
    }

    #[test]
    fn test_validate_room_code_invalid_format() {
        assert!(validate_room_code("AB 2CD").is_err()); // space
        assert!(validate_room_code("AB-2CD").is_err()); // punctuation
        assert!(validate_room_code("ÄB12CD").is_err()); // non-ascii
    }

    #[test]
    fn test_validate_nickname() {
        assert!(validate_nickname("Ana").is_ok());
        assert!(validate_nickname("  ").is_err());
        assert!(validate_nickname(&"x".repeat(33)).is_err());
        assert!(validate_nickname(&"x".repeat(32)).is_ok());
    }
}
