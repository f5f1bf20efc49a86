use serde::Serialize;
use utoipa::ToSchema;

use crate::state::phase::PhaseSnapshot;

/// Phase fields attached to poll responses while a room is running.
///
/// A lobby room carries no phase at all; clients should render the lobby
/// view whenever this object is absent.
#[derive(Debug, Serialize, ToSchema, Clone, Copy)]
pub struct PhaseDto {
    /// `true` during the focus interval, `false` during break.
    pub is_focus: bool,
    /// Whole seconds until the current interval ends.
    pub seconds_remaining: u64,
}

impl From<PhaseSnapshot> for PhaseDto {
    fn from(snapshot: PhaseSnapshot) -> Self {
        Self {
            is_focus: snapshot.is_focus,
            seconds_remaining: snapshot.seconds_remaining,
        }
    }
}
