//! Operations composing the registry, presence tracker, clock, and phase
//! arithmetic into the surface clients call.

use tracing::info;

use crate::{
    dto::{
        room::{
            CreateRoomRequest, HeartbeatRequest, JoinRoomRequest, JoinRoomResponse,
            RoomPollResponse, RoomSummary, StartRoomRequest,
        },
        validation::validate_room_code,
    },
    error::ServiceError,
    state::{SharedState, phase, room::RoomStatus},
};

/// Open a fresh room in its lobby state and hand back its join code.
pub async fn create_room(
    state: &SharedState,
    request: CreateRoomRequest,
) -> Result<RoomSummary, ServiceError> {
    let owner_id = require_identity("owner_id", &request.owner_id)?;
    let title = request.title.trim();
    if title.is_empty() {
        return Err(ServiceError::InvalidInput(
            "room title must not be blank".into(),
        ));
    }

    let room = state.rooms().create(
        owner_id,
        title.to_owned(),
        request.focus_seconds,
        request.break_seconds,
        state.now(),
    )?;

    info!(code = %room.code, room_id = %room.id, "room created");
    Ok(room.into())
}

/// Register a user in a room; joining twice only refreshes their heartbeat.
pub async fn join_room(
    state: &SharedState,
    code: &str,
    request: JoinRoomRequest,
) -> Result<JoinRoomResponse, ServiceError> {
    let code = normalize_code(code)?;
    let user_id = require_identity("user_id", &request.user_id)?;

    let room = state.rooms().get(&code)?;
    let now = state.now();
    state.presence().join(room.id, &user_id, now);
    let participant_count =
        state
            .presence()
            .active_count(room.id, now, state.config().presence_timeout());

    info!(code = %room.code, user_id = %user_id, participant_count, "user joined room");
    Ok(JoinRoomResponse {
        room: room.into(),
        participant_count,
        heartbeat_interval_seconds: state.config().heartbeat_interval_seconds(),
    })
}

/// Begin the shared countdown. Idempotent: once running the existing epoch
/// is returned unchanged, and any participant may trigger the transition.
pub async fn start_room(
    state: &SharedState,
    code: &str,
    request: StartRoomRequest,
) -> Result<RoomSummary, ServiceError> {
    let code = normalize_code(code)?;
    let caller_id = require_identity("caller_id", &request.caller_id)?;

    let room = state.rooms().start(&code, state.now())?;
    info!(code = %room.code, caller_id = %caller_id, "room started");
    Ok(room.into())
}

/// Refresh a participant's liveness. Creates the membership row if the
/// client heartbeats before it formally joins.
pub async fn heartbeat(
    state: &SharedState,
    code: &str,
    request: HeartbeatRequest,
) -> Result<(), ServiceError> {
    let code = normalize_code(code)?;
    let user_id = require_identity("user_id", &request.user_id)?;

    let room = state.rooms().get(&code)?;
    state.presence().heartbeat(room.id, &user_id, state.now());
    Ok(())
}

/// The single read path every client polls: room state, the server's "now",
/// the live participant count, and the phase when the room is running.
/// Performs no writes.
pub async fn poll_room(state: &SharedState, code: &str) -> Result<RoomPollResponse, ServiceError> {
    let code = normalize_code(code)?;
    let room = state.rooms().get(&code)?;
    let now = state.now();

    let participant_count =
        state
            .presence()
            .active_count(room.id, now, state.config().presence_timeout());

    let phase = match (room.status, room.started_at) {
        (RoomStatus::Running, Some(started_at)) => Some(
            phase::compute(room.focus_seconds, room.break_seconds, started_at, now).into(),
        ),
        _ => None,
    };

    Ok(RoomPollResponse {
        room: room.into(),
        server_time: crate::dto::format_system_time(now),
        participant_count,
        heartbeat_interval_seconds: state.config().heartbeat_interval_seconds(),
        phase,
    })
}

/// Join codes are case-insensitive on the way in; the registry stores them
/// uppercase. A code that cannot have been generated is rejected before it
/// reaches the registry.
fn normalize_code(code: &str) -> Result<String, ServiceError> {
    let code = code.trim().to_ascii_uppercase();
    validate_room_code(&code)
        .map_err(|err| ServiceError::InvalidInput(format!("malformed room code: {err}")))?;
    Ok(code)
}

fn require_identity(field: &str, value: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidInput(format!(
            "{field} must not be blank"
        )));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::{
        clock::test_support::ManualClock, config::AppConfig, dto::room::RoomStatusDto,
        state::AppState,
    };

    fn fixture() -> (SharedState, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let state = AppState::with_clock(AppConfig::default(), clock.clone());
        (state, clock)
    }

    fn pomodoro() -> CreateRoomRequest {
        CreateRoomRequest {
            owner_id: "owner-1".into(),
            title: "Finals prep".into(),
            focus_seconds: 1500,
            break_seconds: 600,
        }
    }

    fn join(user_id: &str) -> JoinRoomRequest {
        JoinRoomRequest {
            user_id: user_id.into(),
        }
    }

    #[tokio::test]
    async fn pomodoro_cycle_observed_through_polls() {
        let (state, clock) = fixture();
        let room = create_room(&state, pomodoro()).await.unwrap();
        join_room(&state, &room.code, join("user-a")).await.unwrap();
        start_room(
            &state,
            &room.code,
            StartRoomRequest {
                caller_id: "user-a".into(),
            },
        )
        .await
        .unwrap();

        let poll = poll_room(&state, &room.code).await.unwrap();
        let snapshot = poll.phase.unwrap();
        assert!(snapshot.is_focus);
        assert_eq!(snapshot.seconds_remaining, 1500);
        assert_eq!(poll.room.status, RoomStatusDto::Running);

        clock.advance(Duration::from_secs(1500));
        let snapshot = poll_room(&state, &room.code).await.unwrap().phase.unwrap();
        assert!(!snapshot.is_focus);
        assert_eq!(snapshot.seconds_remaining, 600);

        clock.advance(Duration::from_secs(600));
        let snapshot = poll_room(&state, &room.code).await.unwrap().phase.unwrap();
        assert!(snapshot.is_focus);
        assert_eq!(snapshot.seconds_remaining, 1500);
    }

    #[tokio::test]
    async fn lobby_poll_carries_no_phase() {
        let (state, _clock) = fixture();
        let room = create_room(&state, pomodoro()).await.unwrap();

        let poll = poll_room(&state, &room.code).await.unwrap();
        assert_eq!(poll.room.status, RoomStatusDto::Lobby);
        assert!(poll.phase.is_none());
        assert!(poll.room.started_at.is_none());
    }

    #[tokio::test]
    async fn start_is_idempotent_across_callers() {
        let (state, clock) = fixture();
        let room = create_room(&state, pomodoro()).await.unwrap();

        let first = start_room(
            &state,
            &room.code,
            StartRoomRequest {
                caller_id: "user-a".into(),
            },
        )
        .await
        .unwrap();

        clock.advance(Duration::from_secs(42));
        let second = start_room(
            &state,
            &room.code,
            StartRoomRequest {
                caller_id: "user-b".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(first.started_at, second.started_at);
    }

    #[tokio::test]
    async fn stale_participants_leave_the_count() {
        let (state, clock) = fixture();
        let room = create_room(&state, pomodoro()).await.unwrap();

        join_room(&state, &room.code, join("steady")).await.unwrap();
        join_room(&state, &room.code, join("silent")).await.unwrap();
        assert_eq!(
            poll_room(&state, &room.code).await.unwrap().participant_count,
            2
        );

        // Steady keeps its 10s cadence; silent goes quiet after joining.
        for _ in 0..3 {
            clock.advance(Duration::from_secs(10));
            heartbeat(
                &state,
                &room.code,
                HeartbeatRequest {
                    user_id: "steady".into(),
                },
            )
            .await
            .unwrap();
        }

        clock.advance(Duration::from_secs(1));
        assert_eq!(
            poll_room(&state, &room.code).await.unwrap().participant_count,
            1
        );
    }

    #[tokio::test]
    async fn heartbeat_before_join_registers_the_user() {
        let (state, _clock) = fixture();
        let room = create_room(&state, pomodoro()).await.unwrap();

        heartbeat(
            &state,
            &room.code,
            HeartbeatRequest {
                user_id: "early-bird".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(
            poll_room(&state, &room.code).await.unwrap().participant_count,
            1
        );
    }

    #[tokio::test]
    async fn join_twice_counts_once() {
        let (state, _clock) = fixture();
        let room = create_room(&state, pomodoro()).await.unwrap();

        join_room(&state, &room.code, join("user-a")).await.unwrap();
        let response = join_room(&state, &room.code, join("user-a")).await.unwrap();
        assert_eq!(response.participant_count, 1);
    }

    #[tokio::test]
    async fn codes_are_accepted_case_insensitively() {
        let (state, _clock) = fixture();
        let room = create_room(&state, pomodoro()).await.unwrap();

        let lowered = room.code.to_ascii_lowercase();
        let poll = poll_room(&state, &lowered).await.unwrap();
        assert_eq!(poll.room.code, room.code);
    }

    #[tokio::test]
    async fn unknown_code_is_not_found_everywhere() {
        let (state, _clock) = fixture();

        assert!(matches!(
            poll_room(&state, "ZZZZZZ").await.unwrap_err(),
            ServiceError::NotFound(_)
        ));
        assert!(matches!(
            join_room(&state, "ZZZZZZ", join("user-a")).await.unwrap_err(),
            ServiceError::NotFound(_)
        ));
        assert!(matches!(
            heartbeat(
                &state,
                "ZZZZZZ",
                HeartbeatRequest {
                    user_id: "user-a".into()
                }
            )
            .await
            .unwrap_err(),
            ServiceError::NotFound(_)
        ));
        assert!(matches!(
            start_room(
                &state,
                "ZZZZZZ",
                StartRoomRequest {
                    caller_id: "user-a".into()
                }
            )
            .await
            .unwrap_err(),
            ServiceError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn invalid_config_creates_nothing() {
        let (state, _clock) = fixture();
        let err = create_room(
            &state,
            CreateRoomRequest {
                owner_id: "owner-1".into(),
                title: "Broken".into(),
                focus_seconds: 0,
                break_seconds: 600,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert_eq!(state.rooms().live_rooms(), 0);
    }

    #[tokio::test]
    async fn malformed_code_is_rejected_before_lookup() {
        let (state, _clock) = fixture();
        let err = poll_room(&state, "not a code!").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn blank_identities_are_rejected() {
        let (state, _clock) = fixture();
        let room = create_room(&state, pomodoro()).await.unwrap();

        let err = join_room(&state, &room.code, join("   ")).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }
}
