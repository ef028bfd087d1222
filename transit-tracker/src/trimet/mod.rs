//! TriMet web services client.
//!
//! This module provides an HTTP client for the TriMet developer API, which
//! publishes the route configuration and live vehicle positions.
//!
//! Key characteristics of TriMet:
//! - Authentication is an `appid` query parameter, not a header
//! - Errors often arrive as HTTP 200 with an `error` object inside
//!   `resultSet`
//! - Route and stop ids are numeric on the wire but treated as opaque here

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{TrimetClient, TrimetConfig};
pub use convert::{convert_route_config, convert_vehicles};
pub use error::TrimetError;
pub use mock::MockTrimetClient;
pub use types::{
    DirectionDto, ResultSetError, RouteConfigResponse, RouteConfigResultSet, RouteDto, StopDto,
    VehicleDto, VehiclesResponse, VehiclesResultSet,
};
