//! Short, human-shareable room join codes.

use rand::Rng;

use crate::error::ServiceError;

/// Characters eligible for room codes. Visually ambiguous ones (`I`, `L`,
/// `O`, `0`, `1`) are left out so codes survive being read aloud or copied
/// off a shared screen.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Shortest code length the service will generate or accept. Anything
/// shorter collides too easily to share.
pub const MIN_CODE_LENGTH: usize = 4;
/// Longest code length the service will generate or accept. Anything longer
/// stops being a human-shareable code.
pub const MAX_CODE_LENGTH: usize = 12;

/// Draw a fresh code that does not collide with any code `exists` knows about.
///
/// Collisions are expected to be rare (the six-character default gives about
/// 8.5e8 combinations), so a handful of retries is plenty; exhausting them
/// signals that the live-room population has outgrown the code space and is
/// surfaced as [`ServiceError::CodesExhausted`] rather than looping forever.
pub fn generate<F>(length: usize, retry_limit: u32, exists: F) -> Result<String, ServiceError>
where
    F: Fn(&str) -> bool,
{
    let mut rng = rand::rng();
    for _ in 0..retry_limit {
        let candidate: String = (0..length)
            .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
            .collect();
        if !exists(&candidate) {
            return Ok(candidate);
        }
    }

    Err(ServiceError::CodesExhausted {
        attempts: retry_limit,
    })
}
