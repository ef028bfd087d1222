//! The latest set of vehicle positions.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::{DirectionId, RouteId, VehicleRecord};

/// Vehicle records from one successful fetch, grouped by route and
/// direction. Replaced wholesale; never merged.
#[derive(Debug, Default)]
pub struct VehicleSnapshot {
    by_route: HashMap<(RouteId, DirectionId), Vec<VehicleRecord>>,
    len: usize,
    fetched_at: Option<DateTime<Utc>>,
}

impl VehicleSnapshot {
    pub fn new(vehicles: Vec<VehicleRecord>, fetched_at: DateTime<Utc>) -> Self {
        let len = vehicles.len();
        let mut by_route: HashMap<_, Vec<VehicleRecord>> = HashMap::new();
        for vehicle in vehicles {
            by_route
                .entry((vehicle.route_id.clone(), vehicle.direction))
                .or_default()
                .push(vehicle);
        }

        Self {
            by_route,
            len,
            fetched_at: Some(fetched_at),
        }
    }

    /// Vehicles running on `route` in `direction`.
    pub fn on_route(
        &self,
        route: &RouteId,
        direction: DirectionId,
    ) -> impl Iterator<Item = &VehicleRecord> {
        self.by_route
            .get(&(route.clone(), direction))
            .into_iter()
            .flatten()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// When this snapshot was fetched; `None` before the first success.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }
}
