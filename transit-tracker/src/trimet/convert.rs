//! Conversion from TriMet DTOs to domain types.

use tracing::debug;

use crate::domain::{DirectionId, Mode, VehicleRecord};
use crate::topology::{Direction, Route, StopRef, Topology, TopologyError};

use super::error::TrimetError;
use super::types::{
    DirectionDto, ResultSetError, RouteConfigResponse, RouteDto, StopDto, VehicleDto,
    VehiclesResponse,
};

/// Build the topology from a route configuration response.
///
/// Fails if the response has no route list, or any route has no valid
/// directions.
pub fn convert_route_config(response: &RouteConfigResponse) -> Result<Topology, TopologyError> {
    let result_set = response
        .result_set
        .as_ref()
        .ok_or(TopologyError::MissingResultSet)?;
    let routes = result_set
        .route
        .as_ref()
        .ok_or(TopologyError::MissingRouteList)?;

    let routes = routes
        .iter()
        .map(convert_route)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Topology::from_routes(routes))
}

fn convert_route(dto: &RouteDto) -> Result<Route, TopologyError> {
    let directions = dto
        .dir
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|dir| convert_direction(dto, dir))
        .collect::<Result<Vec<_>, _>>()?;

    let mode = dto
        .kind
        .as_deref()
        .map_or(Mode::Bus, Mode::from_route_type);

    Route::new(
        dto.route.clone(),
        dto.desc.clone().unwrap_or_default(),
        mode,
        directions,
    )
}

fn convert_direction(route: &RouteDto, dto: &DirectionDto) -> Result<Direction, TopologyError> {
    let id = DirectionId::try_from(dto.dir).map_err(|_| TopologyError::InvalidDirection {
        route: route.route.clone(),
        direction: dto.dir,
    })?;

    let stops = dto
        .stop
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(convert_stop)
        .collect();

    Ok(Direction::new(id, dto.desc.clone().unwrap_or_default(), stops))
}

fn convert_stop(dto: &StopDto) -> StopRef {
    StopRef {
        stop_id: dto.locid.clone(),
        name: dto.desc.clone().unwrap_or_default(),
        lat: dto.lat,
        lng: dto.lng,
        seq: dto.seq,
        timepoint: dto.tp.unwrap_or(false),
    }
}

/// Convert a vehicle position response.
///
/// Vehicles without an id, a route number or a valid direction cannot be
/// placed on the topology and are dropped; the rest of the set is kept.
pub fn convert_vehicles(response: VehiclesResponse) -> Result<Vec<VehicleRecord>, TrimetError> {
    let result_set = response.result_set.ok_or(TrimetError::MissingResultSet)?;
    if let Some(error) = result_set.error {
        return Err(result_set_error(error));
    }

    let vehicles = result_set.vehicle.unwrap_or_default();
    let total = vehicles.len();
    let converted: Vec<VehicleRecord> = vehicles.into_iter().filter_map(convert_vehicle).collect();

    if converted.len() < total {
        debug!(
            skipped = total - converted.len(),
            "dropped vehicles without id, route or direction"
        );
    }

    Ok(converted)
}

fn convert_vehicle(dto: VehicleDto) -> Option<VehicleRecord> {
    let vehicle_id = dto.vehicle_id?;
    let route_id = dto.route_number?;
    let direction = u8::try_from(dto.direction?)
        .ok()
        .and_then(|dir| DirectionId::try_from(dir).ok())?;

    Some(VehicleRecord {
        vehicle_id,
        route_id,
        direction,
        message: dto.sign_message_long.or(dto.sign_message).unwrap_or_default(),
        load: dto.load_percentage.unwrap_or(0),
        mode: dto
            .kind
            .as_deref()
            .map_or(Mode::Rail, Mode::from_vehicle_type),
        last_stop: dto.last_loc_id,
        next_stop: dto.next_loc_id,
    })
}

/// Map an error embedded in a result set.
pub(super) fn result_set_error(error: ResultSetError) -> TrimetError {
    let message = error.content.unwrap_or_else(|| "unknown error".to_string());
    if message.to_ascii_lowercase().contains("appid") {
        TrimetError::Unauthorized
    } else {
        TrimetError::Api {
            status: 200,
            message,
        }
    }
}
