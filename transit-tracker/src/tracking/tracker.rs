//! Tracker state: snapshot, registry and position cache.
//!
//! `Tracker` is a plain synchronous state machine. It is owned by exactly
//! one task (see [`super::runner`]), which makes it the single writer of
//! the snapshot, the registry and the position cache.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{RouteId, StopId, VehicleRecord};
use crate::proximity::{nearest, resolve_direction};
use crate::topology::Topology;

use super::error::{TelemetryError, TrackingError};
use super::message::{Position, PositionUpdate, ServerMessage, StopInfo, SubscriptionKey};
use super::registry::SubscriptionRegistry;
use super::snapshot::VehicleSnapshot;
use super::subscriber::{Subscriber, SubscriberId};

/// What a successful follow hands back to the new subscriber.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowAck {
    pub stop_info: StopInfo,

    /// Last broadcast value for the key, if any cycle has computed one.
    pub position: Option<PositionUpdate>,
}

impl FollowAck {
    /// Messages to deliver to the subscriber, stop info first.
    pub fn messages(&self) -> Vec<ServerMessage> {
        let mut messages = vec![ServerMessage::StopInfo(self.stop_info.clone())];
        if let Some(update) = &self.position {
            messages.push(ServerMessage::PositionUpdate(update.clone()));
        }
        messages
    }
}

/// Outcome of applying one fetched snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub vehicles: usize,
    pub keys_evaluated: usize,
    pub broadcasts: usize,
}

/// Point-in-time tracker counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerStatus {
    pub routes: usize,
    pub stops: usize,
    pub subscriptions: usize,
    pub subscribers: usize,
    pub vehicles: usize,
    pub last_fetch: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
}

pub struct Tracker {
    topology: Arc<Topology>,
    registry: SubscriptionRegistry,
    snapshot: VehicleSnapshot,
    positions: HashMap<SubscriptionKey, Position>,
    consecutive_failures: u32,
}

impl Tracker {
    pub fn new(topology: Arc<Topology>) -> Self {
        Self {
            topology,
            registry: SubscriptionRegistry::new(),
            snapshot: VehicleSnapshot::default(),
            positions: HashMap::new(),
            consecutive_failures: 0,
        }
    }

    /// Register interest in a (route, stop) pair.
    ///
    /// Fails without creating a key if the route is not in the topology or
    /// the stop is not in the stop index.
    pub fn follow(
        &mut self,
        route: RouteId,
        stop: StopId,
        subscriber: Subscriber,
    ) -> Result<FollowAck, TrackingError> {
        let Some(route_info) = self.topology.route(&route) else {
            return Err(TrackingError::UnknownRouteOrStop { route, stop });
        };
        if !self.topology.stop_index().contains(&stop) {
            return Err(TrackingError::UnknownRouteOrStop { route, stop });
        }

        let stop_info = StopInfo {
            name: route_info.name.clone(),
            route_id: route.clone(),
            stop_id: stop.clone(),
        };

        let key = SubscriptionKey::new(route, stop);
        let position = self
            .positions
            .get(&key)
            .map(|position| PositionUpdate::new(&key, *position));

        let subscriber_id = subscriber.id();
        if self.registry.follow(key.clone(), subscriber) {
            info!(%key, subscriber = %subscriber_id, "new subscription");
        } else {
            debug!(%key, subscriber = %subscriber_id, "joined subscription");
        }

        Ok(FollowAck {
            stop_info,
            position,
        })
    }

    /// Detach a departed connection from every key it followed.
    pub fn leave(&mut self, subscriber: SubscriberId) {
        for key in self.registry.leave(subscriber) {
            self.positions.remove(&key);
            debug!(%key, "subscription dropped, no subscribers left");
        }
    }

    /// Replace the snapshot, recompute every key and broadcast changes.
    pub fn apply_snapshot(&mut self, vehicles: Vec<VehicleRecord>) -> CycleReport {
        self.snapshot = VehicleSnapshot::new(vehicles, Utc::now());
        self.consecutive_failures = 0;

        let results: Vec<(SubscriptionKey, Position)> = self
            .registry
            .keys()
            .map(|key| (key.clone(), self.compute(key)))
            .collect();

        let keys_evaluated = results.len();
        let mut broadcasts = 0;
        for (key, position) in results {
            if self.positions.get(&key) == Some(&position) {
                continue;
            }

            let message = ServerMessage::PositionUpdate(PositionUpdate::new(&key, position));
            let delivery = self.registry.broadcast(&key, &message);
            broadcasts += 1;

            if delivery.key_removed {
                self.positions.remove(&key);
            } else {
                self.positions.insert(key, position);
            }
        }

        CycleReport {
            vehicles: self.snapshot.len(),
            keys_evaluated,
            broadcasts,
        }
    }

    /// Note a failed fetch. Snapshot and cache are left untouched.
    pub fn record_failure(&mut self, error: &TelemetryError) {
        self.consecutive_failures += 1;
        warn!(
            error = %error,
            consecutive = self.consecutive_failures,
            "vehicle fetch failed, skipping cycle"
        );
    }

    /// Closest approaching vehicle for one key, measured from each
    /// vehicle's last stop.
    pub fn compute(&self, key: &SubscriptionKey) -> Position {
        let Some(route) = self.topology.route(&key.route) else {
            return Position::Unknown;
        };

        let direction_id = match resolve_direction(route, &key.stop) {
            Ok(direction_id) => direction_id,
            Err(err) => {
                debug!(%key, error = %err, "cannot resolve direction");
                return Position::Unknown;
            }
        };

        if !route
            .direction(direction_id)
            .is_some_and(|direction| direction.contains(&key.stop))
        {
            return Position::Unknown;
        }

        let distances = self
            .snapshot
            .on_route(&key.route, direction_id)
            .filter_map(|vehicle| vehicle.last_stop.as_ref())
            .map(|last_stop| {
                self.topology
                    .distance(&key.route, direction_id, last_stop, &key.stop)
            });

        nearest(distances).map_or(Position::NoVehicle, Position::Stops)
    }

    /// Last broadcast value for a key.
    pub fn cached(&self, key: &SubscriptionKey) -> Option<Position> {
        self.positions.get(key).copied()
    }

    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    pub fn status(&self) -> TrackerStatus {
        TrackerStatus {
            routes: self.topology.route_count(),
            stops: self.topology.stop_index().len(),
            subscriptions: self.registry.len(),
            subscribers: self.registry.subscriber_count(),
            vehicles: self.snapshot.len(),
            last_fetch: self.snapshot.fetched_at(),
            consecutive_failures: self.consecutive_failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DirectionId::{Inbound, Outbound};
    use crate::test_support::{topology, vehicle};
    use crate::trimet::TrimetError;
    use tokio::sync::mpsc::Receiver;

    fn key(route: &str, stop: &str) -> SubscriptionKey {
        SubscriptionKey::new(RouteId::new(route), StopId::new(stop))
    }

    fn follow(
        tracker: &mut Tracker,
        route: &str,
        stop: &str,
    ) -> (Subscriber, Receiver<ServerMessage>, FollowAck) {
        let (sub, rx) = Subscriber::channel();
        let ack = tracker
            .follow(RouteId::new(route), StopId::new(stop), sub.clone())
            .unwrap();
        (sub, rx, ack)
    }

    fn drain(rx: &mut Receiver<ServerMessage>) -> Vec<ServerMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg);
        }
        out
    }

    fn positions(messages: &[ServerMessage]) -> Vec<Position> {
        messages
            .iter()
            .filter_map(|m| match m {
                ServerMessage::PositionUpdate(u) => Some(u.position),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn follow_returns_stop_info() {
        let mut tracker = Tracker::new(topology());
        let (_sub, _rx, ack) = follow(&mut tracker, "100", "D");

        assert_eq!(
            ack.stop_info,
            StopInfo {
                name: "MAX Blue Line".into(),
                route_id: RouteId::new("100"),
                stop_id: StopId::new("D"),
            }
        );
        assert!(ack.position.is_none());
        assert_eq!(ack.messages().len(), 1);
        assert!(tracker.registry().contains(&key("100", "D")));
    }

    #[test]
    fn follow_unknown_stop_creates_no_key() {
        let mut tracker = Tracker::new(topology());
        let (sub, _rx) = Subscriber::channel();

        let err = tracker
            .follow(RouteId::new("100"), StopId::new("nowhere"), sub)
            .unwrap_err();

        assert_eq!(
            err,
            TrackingError::UnknownRouteOrStop {
                route: RouteId::new("100"),
                stop: StopId::new("nowhere"),
            }
        );
        assert!(tracker.registry().is_empty());
    }

    #[test]
    fn follow_unknown_route_creates_no_key() {
        let mut tracker = Tracker::new(topology());
        let (sub, _rx) = Subscriber::channel();

        let result = tracker.follow(RouteId::new("999"), StopId::new("A"), sub);

        assert!(matches!(result, Err(TrackingError::UnknownRouteOrStop { .. })));
        assert!(tracker.registry().is_empty());
    }

    #[test]
    fn vehicle_two_stops_before_target() {
        let mut tracker = Tracker::new(topology());
        let (_sub, mut rx, _) = follow(&mut tracker, "100", "D");

        let report = tracker.apply_snapshot(vec![vehicle("v1", "100", Outbound, "B")]);

        assert_eq!(report.broadcasts, 1);
        assert_eq!(positions(&drain(&mut rx)), vec![Position::Stops(2)]);
        assert_eq!(tracker.cached(&key("100", "D")), Some(Position::Stops(2)));
    }

    #[test]
    fn passed_vehicle_is_not_approaching() {
        let mut tracker = Tracker::new(topology());
        let (_sub, mut rx, _) = follow(&mut tracker, "100", "B");

        tracker.apply_snapshot(vec![vehicle("v1", "100", Outbound, "D")]);

        assert_eq!(positions(&drain(&mut rx)), vec![Position::NoVehicle]);
    }

    #[test]
    fn closest_of_several_vehicles() {
        let mut tracker = Tracker::new(topology());
        let (_sub, mut rx, _) = follow(&mut tracker, "100", "D");

        tracker.apply_snapshot(vec![
            vehicle("far", "100", Outbound, "A"),
            vehicle("near", "100", Outbound, "C"),
            vehicle("at-stop", "100", Outbound, "D"),
            vehicle("wrong-way", "100", Inbound, "C"),
            vehicle("other-route", "4", Outbound, "B"),
        ]);

        assert_eq!(positions(&drain(&mut rx)), vec![Position::Stops(0)]);
    }

    #[test]
    fn vehicle_without_last_stop_is_ignored() {
        let mut tracker = Tracker::new(topology());
        let (_sub, mut rx, _) = follow(&mut tracker, "100", "D");

        let mut v = vehicle("v1", "100", Outbound, "A");
        v.last_stop = None;
        v.next_stop = Some(StopId::new("C"));
        tracker.apply_snapshot(vec![v]);

        assert_eq!(positions(&drain(&mut rx)), vec![Position::NoVehicle]);
    }

    #[test]
    fn unchanged_result_is_not_rebroadcast() {
        let mut tracker = Tracker::new(topology());
        let (_sub, mut rx, _) = follow(&mut tracker, "100", "D");

        let first = tracker.apply_snapshot(vec![vehicle("v1", "100", Outbound, "B")]);
        assert_eq!(first.broadcasts, 1);
        drain(&mut rx);

        let second = tracker.apply_snapshot(vec![vehicle("v2", "100", Outbound, "B")]);
        assert_eq!(second.broadcasts, 0);
        assert_eq!(second.keys_evaluated, 1);
        assert!(drain(&mut rx).is_empty());

        let third = tracker.apply_snapshot(vec![vehicle("v2", "100", Outbound, "C")]);
        assert_eq!(third.broadcasts, 1);
        assert_eq!(positions(&drain(&mut rx)), vec![Position::Stops(1)]);
    }

    #[test]
    fn late_follower_gets_priming_value() {
        let mut tracker = Tracker::new(topology());
        let (_first, _rx1, _) = follow(&mut tracker, "100", "D");
        tracker.apply_snapshot(vec![vehicle("v1", "100", Outbound, "B")]);

        let (_second, mut rx2, ack) = follow(&mut tracker, "100", "D");
        assert_eq!(
            ack.position,
            Some(PositionUpdate {
                stop_id: StopId::new("D"),
                route_id: RouteId::new("100"),
                position: Position::Stops(2),
            })
        );
        assert_eq!(ack.messages().len(), 2);
        assert!(matches!(ack.messages()[0], ServerMessage::StopInfo(_)));

        // The priming value is not re-sent by the next unchanged cycle
        tracker.apply_snapshot(vec![vehicle("v1", "100", Outbound, "B")]);
        assert!(drain(&mut rx2).is_empty());
    }

    #[test]
    fn stop_missing_from_resolved_direction_is_unknown() {
        let mut tracker = Tracker::new(topology());
        // X is only on route 4; following it on route 100 passes validation
        // (it is in the stop index) but falls back to direction 1, which
        // does not list it.
        let (_sub, mut rx, _) = follow(&mut tracker, "100", "X");

        tracker.apply_snapshot(vec![vehicle("v1", "100", Inbound, "D")]);
        assert_eq!(positions(&drain(&mut rx)), vec![Position::Unknown]);
    }

    #[test]
    fn unresolvable_key_does_not_affect_others() {
        let mut tracker = Tracker::new(topology());
        // Route 4 has no inbound direction to fall back on for stop A
        let (_bad, mut rx_bad, _) = follow(&mut tracker, "4", "A");
        let (_good, mut rx_good, _) = follow(&mut tracker, "4", "X");

        tracker.apply_snapshot(vec![vehicle("v1", "4", Outbound, "B")]);

        assert_eq!(positions(&drain(&mut rx_bad)), vec![Position::Unknown]);
        assert_eq!(positions(&drain(&mut rx_good)), vec![Position::Stops(1)]);
    }

    #[test]
    fn failed_fetch_leaves_state_alone() {
        let mut tracker = Tracker::new(topology());
        let (_sub, mut rx, _) = follow(&mut tracker, "100", "D");
        tracker.apply_snapshot(vec![vehicle("v1", "100", Outbound, "B")]);
        drain(&mut rx);

        let err = TelemetryError::Upstream(TrimetError::Api {
            status: 503,
            message: "Service Unavailable".into(),
        });
        tracker.record_failure(&err);

        assert_eq!(tracker.cached(&key("100", "D")), Some(Position::Stops(2)));
        assert_eq!(tracker.status().vehicles, 1);
        assert_eq!(tracker.status().consecutive_failures, 1);
        assert!(drain(&mut rx).is_empty());

        tracker.apply_snapshot(vec![vehicle("v1", "100", Outbound, "B")]);
        assert_eq!(tracker.status().consecutive_failures, 0);
    }

    #[test]
    fn leave_drops_key_and_cache() {
        let mut tracker = Tracker::new(topology());
        let (alice, _rx_a, _) = follow(&mut tracker, "100", "D");
        let (bob, mut rx_b, _) = follow(&mut tracker, "100", "C");
        let (_carol, _rx_c, _) = follow(&mut tracker, "100", "D");
        tracker.apply_snapshot(vec![vehicle("v1", "100", Outbound, "B")]);
        drain(&mut rx_b);

        tracker.leave(alice.id());
        assert!(tracker.registry().contains(&key("100", "D")));

        tracker.leave(bob.id());
        assert!(!tracker.registry().contains(&key("100", "C")));
        assert_eq!(tracker.cached(&key("100", "C")), None);
        assert_eq!(tracker.cached(&key("100", "D")), Some(Position::Stops(2)));
    }

    #[test]
    fn closed_connection_is_pruned_on_broadcast() {
        let mut tracker = Tracker::new(topology());
        let (sub, rx, _) = follow(&mut tracker, "100", "D");
        drop(rx);
        drop(sub);

        let report = tracker.apply_snapshot(vec![vehicle("v1", "100", Outbound, "B")]);
        assert_eq!(report.broadcasts, 1);
        assert!(tracker.registry().is_empty());
        assert_eq!(tracker.cached(&key("100", "D")), None);
    }

    #[test]
    fn status_counts() {
        let mut tracker = Tracker::new(topology());
        let (_a, _rx_a, _) = follow(&mut tracker, "100", "D");
        let (_b, _rx_b, _) = follow(&mut tracker, "4", "X");
        tracker.apply_snapshot(vec![vehicle("v1", "100", Outbound, "B")]);

        let status = tracker.status();
        assert_eq!(status.routes, 2);
        assert_eq!(status.stops, 5);
        assert_eq!(status.subscriptions, 2);
        assert_eq!(status.subscribers, 2);
        assert_eq!(status.vehicles, 1);
        assert!(status.last_fetch.is_some());
    }
}
