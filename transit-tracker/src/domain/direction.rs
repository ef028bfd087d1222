//! Direction of travel and service mode.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned for a direction number other than 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid direction {0}: must be 0 or 1")]
pub struct InvalidDirection(pub u8);

/// One of the (at most two) directions of travel on a route.
///
/// Serialized as the upstream number: `0` for outbound, `1` for inbound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DirectionId {
    Outbound,
    Inbound,
}

impl DirectionId {
    /// The upstream direction number.
    pub fn as_u8(self) -> u8 {
        match self {
            DirectionId::Outbound => 0,
            DirectionId::Inbound => 1,
        }
    }

    /// Position of this direction in a two-slot array.
    pub fn index(self) -> usize {
        self.as_u8() as usize
    }
}

impl TryFrom<u8> for DirectionId {
    type Error = InvalidDirection;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DirectionId::Outbound),
            1 => Ok(DirectionId::Inbound),
            other => Err(InvalidDirection(other)),
        }
    }
}

impl From<DirectionId> for u8 {
    fn from(dir: DirectionId) -> u8 {
        dir.as_u8()
    }
}

impl fmt::Display for DirectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Category of a route or vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Mode {
    #[serde(rename = "B")]
    Bus,
    #[serde(rename = "R")]
    Rail,
}

impl Mode {
    /// Parse a route-configuration type tag. `"B"` is bus; everything else
    /// (MAX, WES, streetcar, tram) is treated as rail.
    pub fn from_route_type(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("B") {
            Mode::Bus
        } else {
            Mode::Rail
        }
    }

    /// Parse a vehicle-position type tag (`"bus"` or `"rail"`).
    pub fn from_vehicle_type(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("bus") {
            Mode::Bus
        } else {
            Mode::Rail
        }
    }
}
