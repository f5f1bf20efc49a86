use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::room::{
        CreateRoomRequest, HeartbeatRequest, JoinRoomRequest, JoinRoomResponse, RoomPollResponse,
        RoomSummary, StartRoomRequest,
    },
    error::AppError,
    services::room_service,
    state::SharedState,
};

/// Routes handling the shared-timer room protocol.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/rooms", post(create_room))
        .route("/rooms/{code}", get(poll_room))
        .route("/rooms/{code}/join", post(join_room))
        .route("/rooms/{code}/start", post(start_room))
        .route("/rooms/{code}/heartbeat", post(heartbeat))
}

/// Create a fresh room in its lobby state.
#[utoipa::path(
    post,
    path = "/rooms",
    tag = "room",
    request_body = CreateRoomRequest,
    responses(
        (status = 201, description = "Room created", body = RoomSummary),
        (status = 400, description = "Invalid timer configuration")
    )
)]
pub async fn create_room(
    State(state): State<SharedState>,
    Json(payload): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomSummary>), AppError> {
    payload.validate()?;
    let summary = room_service::create_room(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// Join a room by its share code.
#[utoipa::path(
    post,
    path = "/rooms/{code}/join",
    tag = "room",
    params(("code" = String, Path, description = "Join code of the room")),
    request_body = JoinRoomRequest,
    responses(
        (status = 200, description = "Joined (idempotent)", body = JoinRoomResponse),
        (status = 404, description = "Unknown room code")
    )
)]
pub async fn join_room(
    State(state): State<SharedState>,
    Path(code): Path<String>,
    Json(payload): Json<JoinRoomRequest>,
) -> Result<Json<JoinRoomResponse>, AppError> {
    payload.validate()?;
    let response = room_service::join_room(&state, &code, payload).await?;
    Ok(Json(response))
}

/// Begin the shared countdown; a no-op if the room is already running.
#[utoipa::path(
    post,
    path = "/rooms/{code}/start",
    tag = "room",
    params(("code" = String, Path, description = "Join code of the room")),
    request_body = StartRoomRequest,
    responses(
        (status = 200, description = "Room running (idempotent)", body = RoomSummary),
        (status = 404, description = "Unknown room code")
    )
)]
pub async fn start_room(
    State(state): State<SharedState>,
    Path(code): Path<String>,
    Json(payload): Json<StartRoomRequest>,
) -> Result<Json<RoomSummary>, AppError> {
    payload.validate()?;
    let summary = room_service::start_room(&state, &code, payload).await?;
    Ok(Json(summary))
}

/// Record a presence heartbeat for a participant.
#[utoipa::path(
    post,
    path = "/rooms/{code}/heartbeat",
    tag = "room",
    params(("code" = String, Path, description = "Join code of the room")),
    request_body = HeartbeatRequest,
    responses(
        (status = 204, description = "Heartbeat recorded"),
        (status = 404, description = "Unknown room code")
    )
)]
pub async fn heartbeat(
    State(state): State<SharedState>,
    Path(code): Path<String>,
    Json(payload): Json<HeartbeatRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;
    room_service::heartbeat(&state, &code, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Poll the room: state, server time, live participant count, and phase.
#[utoipa::path(
    get,
    path = "/rooms/{code}",
    tag = "room",
    params(("code" = String, Path, description = "Join code of the room")),
    responses(
        (status = 200, description = "Current room snapshot", body = RoomPollResponse),
        (status = 404, description = "Unknown room code")
    )
)]
pub async fn poll_room(
    State(state): State<SharedState>,
    Path(code): Path<String>,
) -> Result<Json<RoomPollResponse>, AppError> {
    let response = room_service::poll_room(&state, &code).await?;
    Ok(Json(response))
}
