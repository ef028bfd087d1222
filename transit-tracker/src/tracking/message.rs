//! Messages pushed to subscribers.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::domain::{RouteId, StopId};

/// A composite (route, stop) subscription key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionKey {
    pub route: RouteId,
    pub stop: StopId,
}

impl SubscriptionKey {
    pub fn new(route: RouteId, stop: StopId) -> Self {
        Self { route, stop }
    }
}

/// Room label, e.g. `100_8370`. Used for log output only; equality goes
/// through the fields.
impl fmt::Display for SubscriptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.route, self.stop)
    }
}

/// Computed result for one subscription key.
///
/// Serialized as the stop count, or as `"unknown"` / `"no_vehicle"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Closest approaching vehicle is this many stops away.
    Stops(u32),

    /// The stop cannot be located on the route's resolved direction.
    Unknown,

    /// No vehicle on the route and direction is approaching the stop.
    NoVehicle,
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Position::Stops(n) => serializer.serialize_u32(*n),
            Position::Unknown => serializer.serialize_str("unknown"),
            Position::NoVehicle => serializer.serialize_str("no_vehicle"),
        }
    }
}

/// Display info sent once when a follow succeeds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopInfo {
    /// Route display name
    pub name: String,
    pub route_id: RouteId,
    pub stop_id: StopId,
}

/// Distance update for one subscription key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    pub stop_id: StopId,
    pub route_id: RouteId,
    pub position: Position,
}

impl PositionUpdate {
    pub fn new(key: &SubscriptionKey, position: Position) -> Self {
        Self {
            stop_id: key.stop.clone(),
            route_id: key.route.clone(),
            position,
        }
    }
}

/// Everything the tracker sends to a connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    StopInfo(StopInfo),
    PositionUpdate(PositionUpdate),
    Error { message: String },
}
