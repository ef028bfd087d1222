//! Where vehicle positions come from.

use std::future::Future;

use crate::domain::VehicleRecord;

use super::error::TelemetryError;

/// Provider of the current vehicle telemetry set.
///
/// Implemented by the live TriMet client and the file-backed mock.
pub trait VehicleSource: Send + Sync + 'static {
    /// Fetch every vehicle currently reporting.
    fn fetch_vehicles(
        &self,
    ) -> impl Future<Output = Result<Vec<VehicleRecord>, TelemetryError>> + Send;
}
