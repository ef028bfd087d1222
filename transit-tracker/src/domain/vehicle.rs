//! Vehicle telemetry record.

use serde::Serialize;

use super::{DirectionId, Mode, RouteId, StopId, VehicleId};

/// One vehicle's latest reported position.
///
/// Records are never mutated; the whole set is replaced on every poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    pub vehicle_id: VehicleId,
    pub route_id: RouteId,
    pub direction: DirectionId,

    /// Human-readable sign message, e.g. "MAX Blue Line to Gresham".
    pub message: String,

    /// Occupancy percentage; 0 when the feed omits it.
    pub load: u8,

    pub mode: Mode,

    /// Stop the vehicle most recently served or is currently at.
    pub last_stop: Option<StopId>,

    /// Stop the vehicle is heading to.
    pub next_stop: Option<StopId>,
}
