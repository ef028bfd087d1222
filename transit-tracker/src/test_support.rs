//! Shared fixtures for unit tests.

use std::sync::Arc;

use crate::domain::{DirectionId, Mode, RouteId, StopId, VehicleId, VehicleRecord};
use crate::topology::{Direction, Route, StopRef, Topology};
use crate::tracking::{TelemetryError, VehicleSource};

fn stops(ids: &[&str]) -> Vec<StopRef> {
    ids.iter()
        .map(|id| StopRef::new(StopId::new(*id), format!("Stop {id}")))
        .collect()
}

/// Route 100 runs A→B→C→D outbound and D→C→B→A inbound.
/// Route 4 runs outbound only, B→X.
pub fn topology() -> Arc<Topology> {
    let blue = Route::new(
        RouteId::new("100"),
        "MAX Blue Line",
        Mode::Rail,
        vec![
            Direction::new(DirectionId::Outbound, "To Gresham", stops(&["A", "B", "C", "D"])),
            Direction::new(DirectionId::Inbound, "To Hillsboro", stops(&["D", "C", "B", "A"])),
        ],
    )
    .expect("valid route");
    let division = Route::new(
        RouteId::new("4"),
        "Division",
        Mode::Bus,
        vec![Direction::new(DirectionId::Outbound, "To Gresham", stops(&["B", "X"]))],
    )
    .expect("valid route");

    Arc::new(Topology::from_routes(vec![blue, division]))
}

/// A vehicle on `route`/`direction` whose last stop is `last_stop`.
pub fn vehicle(id: &str, route: &str, direction: DirectionId, last_stop: &str) -> VehicleRecord {
    VehicleRecord {
        vehicle_id: VehicleId::new(id),
        route_id: RouteId::new(route),
        direction,
        message: format!("Route {route}"),
        load: 0,
        mode: Mode::Rail,
        last_stop: Some(StopId::new(last_stop)),
        next_stop: None,
    }
}

/// Returns the same vehicles on every fetch.
pub struct StaticSource(pub Vec<VehicleRecord>);

impl VehicleSource for StaticSource {
    async fn fetch_vehicles(&self) -> Result<Vec<VehicleRecord>, TelemetryError> {
        Ok(self.0.clone())
    }
}
