//! Room records and the registry that owns their lifecycle.

use std::time::SystemTime;

use dashmap::{DashMap, mapref::entry::Entry};
use uuid::Uuid;

use crate::{error::ServiceError, state::codes};

/// Upper bound on a single focus or break interval, in seconds. A full day
/// per interval is far beyond any real session and catches clients sending
/// milliseconds by mistake.
pub const MAX_INTERVAL_SECONDS: u32 = 86_400;

/// Lifecycle state of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    /// Participants are gathering; the countdown has not begun.
    Lobby,
    /// The countdown epoch is set and the cycle is in progress.
    Running,
}

/// One shared focus/break timer session.
#[derive(Debug, Clone)]
pub struct Room {
    /// Opaque unique identifier, assigned at creation.
    pub id: Uuid,
    /// Short uppercase join code, unique among live rooms.
    pub code: String,
    /// Identity of the creator.
    pub owner_id: String,
    /// Display label shown to participants.
    pub title: String,
    /// Length of the focus interval in seconds.
    pub focus_seconds: u32,
    /// Length of the break interval in seconds.
    pub break_seconds: u32,
    /// Current lifecycle state.
    pub status: RoomStatus,
    /// Countdown epoch; set exactly once on the lobby-to-running transition.
    pub started_at: Option<SystemTime>,
    /// Creation instant.
    pub created_at: SystemTime,
}

/// In-memory index of live rooms keyed by join code.
///
/// DashMap's per-entry exclusive access serializes mutation at room
/// granularity, which is all the atomicity [`RoomRegistry::start`] needs;
/// reads never take the whole-map view.
pub struct RoomRegistry {
    rooms: DashMap<String, Room>,
    code_length: usize,
    code_retry_limit: u32,
}

impl RoomRegistry {
    /// Construct an empty registry with the given code-generation knobs.
    pub fn new(code_length: usize, code_retry_limit: u32) -> Self {
        Self {
            rooms: DashMap::new(),
            code_length,
            code_retry_limit,
        }
    }

    /// Create a new lobby room, allocating a collision-checked join code.
    pub fn create(
        &self,
        owner_id: String,
        title: String,
        focus_seconds: u32,
        break_seconds: u32,
        now: SystemTime,
    ) -> Result<Room, ServiceError> {
        validate_interval("focus_seconds", focus_seconds)?;
        validate_interval("break_seconds", break_seconds)?;

        for _ in 0..self.code_retry_limit {
            let code = codes::generate(self.code_length, self.code_retry_limit, |candidate| {
                self.rooms.contains_key(candidate)
            })?;

            let room = Room {
                id: Uuid::new_v4(),
                code: code.clone(),
                owner_id: owner_id.clone(),
                title: title.clone(),
                focus_seconds,
                break_seconds,
                status: RoomStatus::Lobby,
                started_at: None,
                created_at: now,
            };

            match self.rooms.entry(code) {
                // Another create claimed this candidate between the
                // collision check and the insert; draw again.
                Entry::Occupied(_) => continue,
                Entry::Vacant(slot) => {
                    slot.insert(room.clone());
                    return Ok(room);
                }
            }
        }

        Err(ServiceError::CodesExhausted {
            attempts: self.code_retry_limit,
        })
    }

    /// Transition a room to running, recording `now` as its countdown epoch.
    ///
    /// Idempotent: a room that is already running is returned unchanged, so
    /// concurrent start calls racing to begin the session all observe the
    /// single epoch written by whichever call got the entry first.
    pub fn start(&self, code: &str, now: SystemTime) -> Result<Room, ServiceError> {
        let mut room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| ServiceError::NotFound(format!("room `{code}` not found")))?;

        if room.status == RoomStatus::Lobby {
            room.status = RoomStatus::Running;
            room.started_at = Some(now);
        }

        Ok(room.clone())
    }

    /// Look up a room by join code.
    pub fn get(&self, code: &str) -> Result<Room, ServiceError> {
        self.rooms
            .get(code)
            .map(|room| room.clone())
            .ok_or_else(|| ServiceError::NotFound(format!("room `{code}` not found")))
    }

    /// Number of rooms currently held by the registry.
    pub fn live_rooms(&self) -> usize {
        self.rooms.len()
    }
}

fn validate_interval(field: &str, seconds: u32) -> Result<(), ServiceError> {
    if seconds == 0 {
        return Err(ServiceError::InvalidInput(format!(
            "{field} must be strictly positive"
        )));
    }
    if seconds > MAX_INTERVAL_SECONDS {
        return Err(ServiceError::InvalidInput(format!(
            "{field} must not exceed {MAX_INTERVAL_SECONDS} seconds"
        )));
    }
    Ok(())
}
