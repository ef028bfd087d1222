//! Domain types for the transit tracker.
//!
//! Identifiers, directions and vehicle records shared by the topology,
//! the upstream client and the tracking engine.

mod direction;
mod ids;
mod vehicle;

pub use direction::{DirectionId, InvalidDirection, Mode};
pub use ids::{RouteId, StopId, VehicleId};
pub use vehicle::VehicleRecord;
