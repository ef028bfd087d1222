//! Routes, directions and stop sequences.

use crate::domain::{DirectionId, Mode, RouteId, StopId};

use super::error::TopologyError;

/// A stop as it appears inside a direction's sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct StopRef {
    pub stop_id: StopId,
    pub name: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,

    /// Upstream sequence number, for display only.
    pub seq: Option<u32>,

    /// Whether this stop is a schedule timepoint.
    pub timepoint: bool,
}

impl StopRef {
    /// A stop reference with only an id and a name.
    pub fn new(stop_id: StopId, name: impl Into<String>) -> Self {
        Self {
            stop_id,
            name: name.into(),
            lat: None,
            lng: None,
            seq: None,
            timepoint: false,
        }
    }
}

/// One direction of travel with its stops in physical order.
///
/// Index `i` comes before index `i + 1` in travel order; this ordering is
/// the only notion of distance the tracker uses.
#[derive(Debug, Clone, PartialEq)]
pub struct Direction {
    pub id: DirectionId,
    pub name: String,
    stops: Vec<StopRef>,
}

impl Direction {
    pub fn new(id: DirectionId, name: impl Into<String>, stops: Vec<StopRef>) -> Self {
        Self {
            id,
            name: name.into(),
            stops,
        }
    }

    /// Stops in travel order.
    pub fn stops(&self) -> &[StopRef] {
        &self.stops
    }

    /// Ordinal of the first occurrence of `stop`.
    pub fn position(&self, stop: &StopId) -> Option<usize> {
        self.stops.iter().position(|s| &s.stop_id == stop)
    }

    pub fn contains(&self, stop: &StopId) -> bool {
        self.position(stop).is_some()
    }
}

/// A transit line with up to two directions.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub id: RouteId,
    pub name: String,
    pub mode: Mode,
    directions: [Option<Direction>; 2],
}

impl Route {
    /// Create a route from its direction blocks.
    ///
    /// A route needs at least one direction, and each direction id may
    /// appear once.
    pub fn new(
        id: RouteId,
        name: impl Into<String>,
        mode: Mode,
        directions: Vec<Direction>,
    ) -> Result<Self, TopologyError> {
        if directions.is_empty() {
            return Err(TopologyError::NoDirections(id));
        }

        let mut slots: [Option<Direction>; 2] = [None, None];
        for direction in directions {
            let slot = &mut slots[direction.id.index()];
            if slot.is_some() {
                return Err(TopologyError::DuplicateDirection {
                    route: id,
                    direction: direction.id.as_u8(),
                });
            }
            *slot = Some(direction);
        }

        Ok(Self {
            id,
            name: name.into(),
            mode,
            directions: slots,
        })
    }

    pub fn direction(&self, id: DirectionId) -> Option<&Direction> {
        self.directions[id.index()].as_ref()
    }

    /// Directions present on this route, outbound first.
    pub fn directions(&self) -> impl Iterator<Item = &Direction> {
        self.directions.iter().flatten()
    }
}
