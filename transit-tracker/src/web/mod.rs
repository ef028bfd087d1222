//! Web layer for the transit tracker.
//!
//! Provides the stop lookup and status endpoints, and the WebSocket that
//! clients use to follow stops.

mod dto;
mod routes;
mod socket;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
