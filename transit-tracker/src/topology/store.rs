//! The immutable route/stop topology.

use std::collections::HashMap;

use tracing::warn;

use crate::domain::{DirectionId, RouteId, StopId};
use crate::proximity::{Proximity, distance};

use super::index::{StopIndex, StopMeta};
use super::model::Route;

/// All routes and stops known to the tracker.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    routes: HashMap<RouteId, Route>,
    stops: StopIndex,
}

impl Topology {
    /// Build a topology and its stop index from converted routes.
    pub fn from_routes(routes: Vec<Route>) -> Self {
        let mut by_id = HashMap::with_capacity(routes.len());
        // Input order, so that stop display fields merge deterministically
        let mut order: Vec<RouteId> = Vec::with_capacity(routes.len());
        for route in routes {
            let id = route.id.clone();
            if by_id.insert(id.clone(), route).is_some() {
                warn!(route = %id, "route listed twice, keeping the later entry");
                order.retain(|r| r != &id);
            }
            order.push(id);
        }

        let stops = StopIndex::build(order.iter().filter_map(|id| by_id.get(id)));
        Self {
            routes: by_id,
            stops,
        }
    }

    pub fn route(&self, id: &RouteId) -> Option<&Route> {
        self.routes.get(id)
    }

    pub fn stop(&self, id: &StopId) -> Option<&StopMeta> {
        self.stops.get(id)
    }

    pub fn stop_index(&self) -> &StopIndex {
        &self.stops
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Stop-count distance between two stops on one direction of a route.
    ///
    /// `Unknown` if the route or direction does not exist.
    pub fn distance(
        &self,
        route: &RouteId,
        direction: DirectionId,
        from: &StopId,
        to: &StopId,
    ) -> Proximity {
        self.route(route)
            .and_then(|r| r.direction(direction))
            .map_or(Proximity::Unknown, |d| distance(d, from, to))
    }
}
