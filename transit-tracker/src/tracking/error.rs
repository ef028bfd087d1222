//! Tracking errors.

use std::time::Duration;

use crate::domain::{RouteId, StopId};
use crate::trimet::TrimetError;

/// Errors that reject a single tracker request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackingError {
    /// The route is not in the topology or the stop is not in the stop index
    #[error("unknown route {route} or stop {stop}")]
    UnknownRouteOrStop { route: RouteId, stop: StopId },

    /// The stop cannot be placed on any direction of the route
    #[error("stop {stop} is not served by route {route}")]
    UnknownStopForRoute { route: RouteId, stop: StopId },

    /// The poll loop has shut down
    #[error("tracker is not running")]
    TrackerStopped,
}

/// A vehicle fetch that did not produce a usable snapshot.
///
/// Never surfaced to subscribers; the cycle is skipped.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error(transparent)]
    Upstream(#[from] TrimetError),

    #[error("vehicle fetch timed out after {0:?}")]
    Timeout(Duration),
}
