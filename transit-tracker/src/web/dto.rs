//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{RouteId, StopId};

/// Query for a stop lookup.
#[derive(Debug, Deserialize)]
pub struct StopSearchRequest {
    #[serde(rename = "stopId")]
    pub stop_id: StopId,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Events a client may send over the socket.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Start receiving updates for a (route, stop) pair.
    FollowStop {
        stop: StopId,
        #[serde(rename = "routeId")]
        route_id: RouteId,
    },
}
