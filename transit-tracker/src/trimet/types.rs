//! TriMet web services response DTOs.
//!
//! These map directly onto the JSON returned by `V1/routeConfig` and
//! `v2/vehicles`. Fields are `Option` wherever TriMet omits them rather
//! than sending null.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{RouteId, StopId, VehicleId};

/// Deserialize a field as `None` when it is absent, null or of the wrong
/// shape, so one odd vehicle cannot fail the whole response.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Error object TriMet embeds in `resultSet` instead of an HTTP status.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResultSetError {
    pub content: Option<String>,
}

/// Response from `V1/routeConfig`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteConfigResponse {
    pub result_set: Option<RouteConfigResultSet>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfigResultSet {
    pub route: Option<Vec<RouteDto>>,
    pub error: Option<ResultSetError>,
}

/// One route in the route configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteDto {
    /// Route number.
    pub route: RouteId,

    /// Display name, e.g. "MAX Blue Line".
    pub desc: Option<String>,

    /// Type tag: "B" for bus, "R" for rail.
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// Direction blocks; at most two.
    pub dir: Option<Vec<DirectionDto>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DirectionDto {
    /// Direction number, 0 or 1.
    pub dir: u8,

    /// Display name, e.g. "To Gresham".
    pub desc: Option<String>,

    /// Stops in travel order.
    pub stop: Option<Vec<StopDto>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StopDto {
    pub locid: StopId,
    pub desc: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub seq: Option<u32>,

    /// Timepoint flag.
    pub tp: Option<bool>,
}

/// Response from `v2/vehicles`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclesResponse {
    pub result_set: Option<VehiclesResultSet>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclesResultSet {
    pub vehicle: Option<Vec<VehicleDto>>,

    /// Epoch milliseconds when the set was generated.
    pub query_time: Option<i64>,

    pub error: Option<ResultSetError>,
}

/// One vehicle position.
///
/// Every field is optional and tolerant of bad values; `convert_vehicles`
/// decides which records are usable.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDto {
    #[serde(rename = "vehicleID", default, deserialize_with = "lenient")]
    pub vehicle_id: Option<VehicleId>,

    #[serde(default, deserialize_with = "lenient")]
    pub route_number: Option<RouteId>,

    /// Direction number; anything but 0 or 1 makes the record unusable.
    #[serde(default, deserialize_with = "lenient")]
    pub direction: Option<i64>,

    /// "bus" or "rail".
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub sign_message_long: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub sign_message: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub load_percentage: Option<u8>,

    #[serde(rename = "lastLocID", default, deserialize_with = "lenient")]
    pub last_loc_id: Option<StopId>,

    #[serde(rename = "nextLocID", default, deserialize_with = "lenient")]
    pub next_loc_id: Option<StopId>,
}
