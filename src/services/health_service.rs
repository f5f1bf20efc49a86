use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with a static health payload; the service holds all of its state
/// in memory, so there is no backend to probe.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    HealthResponse::ok(state.rooms().live_rooms())
}
