//! Topology load errors.

use crate::domain::RouteId;

/// The upstream route configuration could not be turned into a topology.
///
/// Fatal at startup: without a topology no subscription can be served.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// Response had no `resultSet`
    #[error("route configuration has no result set")]
    MissingResultSet,

    /// Result set had no route list
    #[error("route configuration has no route list")]
    MissingRouteList,

    /// A route came with no direction blocks
    #[error("route {0} has no directions")]
    NoDirections(RouteId),

    /// A direction block carried a number other than 0 or 1
    #[error("route {route} has invalid direction {direction}")]
    InvalidDirection { route: RouteId, direction: u8 },

    /// Two direction blocks of the same route share a number
    #[error("route {route} lists direction {direction} more than once")]
    DuplicateDirection { route: RouteId, direction: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            TopologyError::MissingRouteList.to_string(),
            "route configuration has no route list"
        );

        let err = TopologyError::NoDirections(RouteId::new("100"));
        assert_eq!(err.to_string(), "route 100 has no directions");

        let err = TopologyError::DuplicateDirection {
            route: RouteId::new("90"),
            direction: 1,
        };
        assert_eq!(err.to_string(), "route 90 lists direction 1 more than once");
    }
}
