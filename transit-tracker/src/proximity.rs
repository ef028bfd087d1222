//! Direction resolution and stop-count distance.

use crate::domain::{DirectionId, StopId};
use crate::topology::{Direction, Route};
use crate::tracking::TrackingError;

/// Stop-count offset from a vehicle's reference stop to a target stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proximity {
    /// The target is this many stops ahead (0 = at the stop).
    Stops(u32),

    /// The vehicle is already beyond the target in travel order.
    Passed,

    /// One of the stops is not on the direction's sequence.
    Unknown,
}

impl Proximity {
    /// The stop count, if the vehicle is approaching.
    pub fn stops(self) -> Option<u32> {
        match self {
            Proximity::Stops(n) => Some(n),
            Proximity::Passed | Proximity::Unknown => None,
        }
    }
}

/// Which direction of `route` the stop belongs to.
///
/// Direction 0 wins if it lists the stop. Otherwise direction 1 is assumed
/// without checking that it actually lists the stop; callers computing a
/// distance will get [`Proximity::Unknown`] in that case. Only a route with
/// no direction 1 to fall back on yields an error.
pub fn resolve_direction(route: &Route, stop: &StopId) -> Result<DirectionId, TrackingError> {
    let in_outbound = route
        .direction(DirectionId::Outbound)
        .is_some_and(|d| d.contains(stop));
    if in_outbound {
        return Ok(DirectionId::Outbound);
    }

    if route.direction(DirectionId::Inbound).is_some() {
        return Ok(DirectionId::Inbound);
    }

    Err(TrackingError::UnknownStopForRoute {
        route: route.id.clone(),
        stop: stop.clone(),
    })
}

/// Distance from `from` to `to` along one direction's stop sequence.
pub fn distance(direction: &Direction, from: &StopId, to: &StopId) -> Proximity {
    let (Some(from_idx), Some(to_idx)) = (direction.position(from), direction.position(to)) else {
        return Proximity::Unknown;
    };

    match to_idx.checked_sub(from_idx) {
        Some(ahead) => Proximity::Stops(ahead as u32),
        None => Proximity::Passed,
    }
}

/// Closest approaching distance among several vehicles.
pub fn nearest(distances: impl IntoIterator<Item = Proximity>) -> Option<u32> {
    distances.into_iter().filter_map(Proximity::stops).min()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::topology::StopRef;
    use proptest::prelude::*;

    /// A direction of `len` distinct stops named "0", "1", ...
    fn numbered(len: usize) -> Direction {
        let stops = (0..len)
            .map(|i| StopRef::new(StopId::new(i.to_string()), format!("Stop {i}")))
            .collect();
        Direction::new(DirectionId::Outbound, "generated", stops)
    }

    proptest! {
        /// Swapping the arguments never yields two approaching results,
        /// except for the same stop where both are zero.
        #[test]
        fn antisymmetric(len in 1usize..40, a in 0usize..40, b in 0usize..40) {
            let a = a % len;
            let b = b % len;
            let dir = numbered(len);
            let (sa, sb) = (StopId::new(a.to_string()), StopId::new(b.to_string()));

            let ab = distance(&dir, &sa, &sb);
            let ba = distance(&dir, &sb, &sa);

            if a == b {
                prop_assert_eq!(ab, Proximity::Stops(0));
                prop_assert_eq!(ba, Proximity::Stops(0));
            } else {
                prop_assert!(ab.stops().is_some() != ba.stops().is_some());
                prop_assert!(ab == Proximity::Passed || ba == Proximity::Passed);
            }
        }

        /// Approaching distance equals the index difference.
        #[test]
        fn index_difference(len in 1usize..40, a in 0usize..40, b in 0usize..40) {
            let a = a % len;
            let b = b % len;
            let dir = numbered(len);
            let d = distance(&dir, &StopId::new(a.to_string()), &StopId::new(b.to_string()));

            if b >= a {
                prop_assert_eq!(d, Proximity::Stops((b - a) as u32));
            } else {
                prop_assert_eq!(d, Proximity::Passed);
            }
        }

        /// Any id outside the sequence gives Unknown, never a number.
        #[test]
        fn absent_always_unknown(len in 1usize..40, a in 0usize..40, absent in "[a-z]{1,6}") {
            let a = a % len;
            let dir = numbered(len);
            let present = StopId::new(a.to_string());
            let absent = StopId::new(absent);

            prop_assert_eq!(distance(&dir, &absent, &present), Proximity::Unknown);
            prop_assert_eq!(distance(&dir, &present, &absent), Proximity::Unknown);
        }
    }
}
