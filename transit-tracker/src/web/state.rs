//! Application state for the web layer.

use std::sync::Arc;

use crate::topology::Topology;
use crate::tracking::TrackerHandle;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Route and stop topology, read-only after load
    pub topology: Arc<Topology>,

    /// Command handle for the poll loop
    pub tracker: TrackerHandle,
}

impl AppState {
    /// Create a new app state.
    pub fn new(topology: Arc<Topology>, tracker: TrackerHandle) -> Self {
        Self { topology, tracker }
    }
}
