//! Shared application state and the domain types it owns.

pub mod codes;
pub mod phase;
pub mod presence;
pub mod room;

use std::{sync::Arc, time::SystemTime};

use crate::{
    clock::{Clock, SystemClock},
    config::AppConfig,
    state::{presence::PresenceTracker, room::RoomRegistry},
};

/// Cheaply cloneable handle to the central application state.
pub type SharedState = Arc<AppState>;

/// Central application state: configuration, the clock, and the in-memory
/// room and participant tables.
pub struct AppState {
    config: AppConfig,
    clock: Arc<dyn Clock>,
    rooms: RoomRegistry,
    presence: PresenceTracker,
}

impl AppState {
    /// Construct the shared state with the production wall clock.
    pub fn new(config: AppConfig) -> SharedState {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Construct the shared state with an explicit clock implementation.
    pub fn with_clock(config: AppConfig, clock: Arc<dyn Clock>) -> SharedState {
        let rooms = RoomRegistry::new(config.code_length(), config.code_retry_limit());
        Arc::new(Self {
            config,
            clock,
            rooms,
            presence: PresenceTracker::new(),
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Current server time as seen by every operation in this process.
    pub fn now(&self) -> SystemTime {
        self.clock.now()
    }

    /// Registry of live rooms.
    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    /// Participant table.
    pub fn presence(&self) -> &PresenceTracker {
        &self.presence
    }
}
