//! Subscription registry: which (route, stop) pairs have listeners.

use std::collections::HashMap;

use tracing::debug;

use super::message::{ServerMessage, SubscriptionKey};
use super::subscriber::{Subscriber, SubscriberId};

/// Result of sending one message to a key's group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// Subscribers that accepted the message.
    pub delivered: usize,

    /// The group lost its last member and the key was dropped.
    pub key_removed: bool,
}

/// Subscription keys and the subscribers attached to each.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    groups: HashMap<SubscriptionKey, HashMap<SubscriberId, Subscriber>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `subscriber` to `key`, creating the key if needed.
    ///
    /// Returns true if the key was created by this call. Following the same
    /// key twice with the same subscriber leaves a single membership.
    pub fn follow(&mut self, key: SubscriptionKey, subscriber: Subscriber) -> bool {
        let created = !self.groups.contains_key(&key);
        self.groups
            .entry(key)
            .or_default()
            .insert(subscriber.id(), subscriber);
        created
    }

    /// Detach a subscriber from every key.
    ///
    /// Returns the keys that were removed because they became empty.
    pub fn leave(&mut self, id: SubscriberId) -> Vec<SubscriptionKey> {
        let mut emptied = Vec::new();
        self.groups.retain(|key, members| {
            members.remove(&id);
            if members.is_empty() {
                emptied.push(key.clone());
                false
            } else {
                true
            }
        });
        emptied
    }

    /// Send `message` to every member of `key`'s group.
    ///
    /// Members whose connection has closed, or whose outbound buffer is
    /// full, are pruned.
    pub fn broadcast(&mut self, key: &SubscriptionKey, message: &ServerMessage) -> Delivery {
        let Some(members) = self.groups.get_mut(key) else {
            return Delivery {
                delivered: 0,
                key_removed: false,
            };
        };

        let before = members.len();
        members.retain(|_, subscriber| subscriber.send(message.clone()));
        let delivered = members.len();
        if delivered < before {
            debug!(%key, pruned = before - delivered, "pruned unreachable subscribers");
        }

        let key_removed = members.is_empty();
        if key_removed {
            self.groups.remove(key);
        }

        Delivery {
            delivered,
            key_removed,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &SubscriptionKey> {
        self.groups.keys()
    }

    pub fn contains(&self, key: &SubscriptionKey) -> bool {
        self.groups.contains_key(key)
    }

    /// Number of subscribers attached to `key`.
    pub fn members(&self, key: &SubscriptionKey) -> usize {
        self.groups.get(key).map_or(0, HashMap::len)
    }

    /// Number of distinct subscribers across all keys.
    pub fn subscriber_count(&self) -> usize {
        let mut ids: Vec<SubscriberId> = self
            .groups
            .values()
            .flat_map(|members| members.keys().copied())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
