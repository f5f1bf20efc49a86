use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the study room backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::room::create_room,
        crate::routes::room::join_room,
        crate::routes::room::start_room,
        crate::routes::room::heartbeat,
        crate::routes::room::poll_room,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::room::CreateRoomRequest,
            crate::dto::room::JoinRoomRequest,
            crate::dto::room::StartRoomRequest,
            crate::dto::room::HeartbeatRequest,
            crate::dto::room::RoomSummary,
            crate::dto::room::RoomStatusDto,
            crate::dto::room::JoinRoomResponse,
            crate::dto::room::RoomPollResponse,
            crate::dto::phase::PhaseDto,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "room", description = "Shared focus/break timer rooms"),
    )
)]
pub struct ApiDoc;
