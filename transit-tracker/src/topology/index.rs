//! Stop metadata lookup.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::domain::{RouteId, StopId};

use super::model::{Route, StopRef};

/// Canonical metadata for a stop, merged across every route serving it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopMeta {
    pub stop_id: StopId,
    pub name: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub seq: Option<u32>,
    pub timepoint: bool,

    /// Routes serving this stop, deduplicated.
    pub routes: BTreeSet<RouteId>,
}

impl StopMeta {
    fn empty(stop_id: StopId) -> Self {
        Self {
            stop_id,
            name: String::new(),
            lat: None,
            lng: None,
            seq: None,
            timepoint: false,
            routes: BTreeSet::new(),
        }
    }

    /// Overlay display fields from a newer occurrence.
    fn merge(&mut self, stop: &StopRef) {
        if !stop.name.is_empty() {
            self.name.clone_from(&stop.name);
        }
        if stop.lat.is_some() {
            self.lat = stop.lat;
        }
        if stop.lng.is_some() {
            self.lng = stop.lng;
        }
        if stop.seq.is_some() {
            self.seq = stop.seq;
        }
        self.timepoint = stop.timepoint;
    }
}

/// Stop id → metadata.
#[derive(Debug, Clone, Default)]
pub struct StopIndex {
    stops: HashMap<StopId, StopMeta>,
}

impl StopIndex {
    /// Build the index from every stop occurrence on every route.
    pub fn build<'a>(routes: impl IntoIterator<Item = &'a Route>) -> Self {
        let mut index = Self::default();
        for route in routes {
            for direction in route.directions() {
                for stop in direction.stops() {
                    index.upsert(&route.id, stop);
                }
            }
        }
        index
    }

    fn upsert(&mut self, route: &RouteId, stop: &StopRef) {
        let meta = self
            .stops
            .entry(stop.stop_id.clone())
            .or_insert_with(|| StopMeta::empty(stop.stop_id.clone()));
        meta.merge(stop);
        meta.routes.insert(route.clone());
    }

    pub fn get(&self, stop: &StopId) -> Option<&StopMeta> {
        self.stops.get(stop)
    }

    pub fn contains(&self, stop: &StopId) -> bool {
        self.stops.contains_key(stop)
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}
