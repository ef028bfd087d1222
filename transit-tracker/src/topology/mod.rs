//! Route and stop topology.
//!
//! Routes, their one or two directions and the ordered stop sequence of
//! each direction, plus a stop index aggregated across routes. Loaded once
//! from the upstream route configuration and read-only afterwards.

mod error;
mod index;
mod model;
mod store;

pub use error::TopologyError;
pub use index::{StopIndex, StopMeta};
pub use model::{Direction, Route, StopRef};
pub use store::Topology;
