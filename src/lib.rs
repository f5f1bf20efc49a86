//! Library crate for study-room-back, exposing modules for binaries and integration tests.

mod clock;
mod config;
mod dto;
mod error;
pub mod routes;
pub mod services;
pub mod state;
