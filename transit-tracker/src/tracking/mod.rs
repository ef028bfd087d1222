//! Proximity tracking and subscription fanout.
//!
//! Clients follow (route, stop) pairs. Every poll cycle the tracker fetches
//! the current vehicle positions, computes how many stops the closest
//! approaching vehicle is from each followed stop, and pushes the result to
//! the pair's subscribers only when it changed since the last broadcast.

mod config;
mod error;
mod message;
mod registry;
pub mod runner;
mod snapshot;
mod source;
mod subscriber;
mod tracker;

pub use config::TrackerConfig;
pub use error::{TelemetryError, TrackingError};
pub use message::{Position, PositionUpdate, ServerMessage, StopInfo, SubscriptionKey};
pub use registry::{Delivery, SubscriptionRegistry};
pub use runner::{TrackerHandle, spawn};
pub use snapshot::VehicleSnapshot;
pub use source::VehicleSource;
pub use subscriber::{SUBSCRIBER_BUFFER, Subscriber, SubscriberId};
pub use tracker::{CycleReport, FollowAck, Tracker, TrackerStatus};
