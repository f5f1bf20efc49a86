use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status (always "ok"; the service keeps no external backends).
    pub status: String,
    /// Number of rooms currently held in memory.
    pub live_rooms: usize,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(live_rooms: usize) -> Self {
        Self {
            status: "ok".to_string(),
            live_rooms,
        }
    }
}
