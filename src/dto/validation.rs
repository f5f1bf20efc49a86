//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::state::codes::{CODE_ALPHABET, MAX_CODE_LENGTH, MIN_CODE_LENGTH};

/// Validates that a join code is plausibly one we generated: uppercase
/// characters from the code alphabet, with a length inside the window the
/// generator can be configured to (the exact configured length is not known
/// at DTO level, so only the window applies here).
///
/// # Examples
///
/// ```ignore
/// validate_room_code("XK47QP") // Ok
/// validate_room_code("xk47qp") // Err - lowercase
/// validate_room_code("XK0")    // Err - too short, ambiguous character
/// ```
pub fn validate_room_code(code: &str) -> Result<(), ValidationError> {
    if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&code.len()) {
        let mut err = ValidationError::new("room_code_length");
        err.message = Some(
            format!(
                "Room code must be {MIN_CODE_LENGTH}-{MAX_CODE_LENGTH} characters (got {})",
                code.len()
            )
            .into(),
        );
        return Err(err);
    }

    if !code.bytes().all(|b| CODE_ALPHABET.contains(&b)) {
        let mut err = ValidationError::new("room_code_format");
        err.message =
            Some("Room code must contain only uppercase letters and digits 2-9".into());
        return Err(err);
    }

    Ok(())
}
