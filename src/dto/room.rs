use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{format_system_time, phase::PhaseDto},
    state::room::{MAX_INTERVAL_SECONDS, Room, RoomStatus},
};

/// Payload used to open a fresh room in its lobby state.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateRoomRequest {
    /// Identity of the creator, as issued by the auth layer.
    #[validate(length(min = 1, max = 128))]
    pub owner_id: String,
    /// Display label for the room.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Focus interval length in seconds.
    #[validate(range(min = 1, max = 86_400))]
    pub focus_seconds: u32,
    /// Break interval length in seconds.
    #[validate(range(min = 1, max = 86_400))]
    pub break_seconds: u32,
}

/// Payload sent when a user joins a room by code.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct JoinRoomRequest {
    /// Identity of the joining user.
    #[validate(length(min = 1, max = 128))]
    pub user_id: String,
}

/// Payload sent to begin the shared countdown.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct StartRoomRequest {
    /// Identity of the caller; any participant may start the room.
    #[validate(length(min = 1, max = 128))]
    pub caller_id: String,
}

/// Payload sent on the periodic presence heartbeat.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct HeartbeatRequest {
    /// Identity of the heartbeating user.
    #[validate(length(min = 1, max = 128))]
    pub user_id: String,
}

/// Publicly visible room lifecycle state.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatusDto {
    /// Waiting for participants; no countdown yet.
    Lobby,
    /// Countdown in progress.
    Running,
}

impl From<RoomStatus> for RoomStatusDto {
    fn from(value: RoomStatus) -> Self {
        match value {
            RoomStatus::Lobby => RoomStatusDto::Lobby,
            RoomStatus::Running => RoomStatusDto::Running,
        }
    }
}

/// Projection of a room exposed to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomSummary {
    /// Opaque room identifier.
    pub id: Uuid,
    /// Short join code to share with other participants.
    pub code: String,
    /// Identity of the creator.
    pub owner_id: String,
    /// Display label.
    pub title: String,
    /// Focus interval length in seconds.
    pub focus_seconds: u32,
    /// Break interval length in seconds.
    pub break_seconds: u32,
    /// Current lifecycle state.
    pub status: RoomStatusDto,
    /// Countdown epoch (RFC 3339), absent while in the lobby.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    /// Creation instant (RFC 3339).
    pub created_at: String,
}

impl From<Room> for RoomSummary {
    fn from(room: Room) -> Self {
        Self {
            id: room.id,
            code: room.code,
            owner_id: room.owner_id,
            title: room.title,
            focus_seconds: room.focus_seconds,
            break_seconds: room.break_seconds,
            status: room.status.into(),
            started_at: room.started_at.map(format_system_time),
            created_at: format_system_time(room.created_at),
        }
    }
}

/// Response returned when a user joins a room.
#[derive(Debug, Serialize, ToSchema)]
pub struct JoinRoomResponse {
    /// The joined room.
    pub room: RoomSummary,
    /// Live participant count including the joiner.
    pub participant_count: usize,
    /// Cadence (seconds) at which the client should send heartbeats.
    pub heartbeat_interval_seconds: u64,
}

/// Response returned by the polling endpoint every client calls on cadence.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomPollResponse {
    /// Current room state.
    pub room: RoomSummary,
    /// Server-side "now" (RFC 3339) used for every derived field in this
    /// response; clients pair it with `room.started_at` so their own clock
    /// never enters the phase computation.
    pub server_time: String,
    /// Participants with a sufficiently recent heartbeat.
    pub participant_count: usize,
    /// Cadence (seconds) at which the client should send heartbeats.
    pub heartbeat_interval_seconds: u64,
    /// Phase fields, present only while the room is running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<PhaseDto>,
}

// The `range` literals on CreateRoomRequest must track the domain bound.
const _: () = assert!(MAX_INTERVAL_SECONDS == 86_400);
