//! Transport-side subscriber handles.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

use super::message::ServerMessage;

/// Messages a connection may have queued before it is treated as stalled.
pub const SUBSCRIBER_BUFFER: usize = 64;

static NEXT_SUBSCRIBER: AtomicU64 = AtomicU64::new(1);

/// Process-unique id of one client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outbound half of a client connection.
///
/// The tracker only ever pushes into the channel; the transport drains the
/// receiver and writes frames. The channel is bounded and never awaited on,
/// so a stalled connection cannot hold up the tracker.
#[derive(Debug, Clone)]
pub struct Subscriber {
    id: SubscriberId,
    tx: mpsc::Sender<ServerMessage>,
}

impl Subscriber {
    /// A new subscriber and the receiver its connection should drain.
    pub fn channel() -> (Self, mpsc::Receiver<ServerMessage>) {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_BUFFER);
        let id = SubscriberId(NEXT_SUBSCRIBER.fetch_add(1, Ordering::Relaxed));
        (Self { id, tx }, rx)
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Queue a message without waiting.
    ///
    /// Returns false if the connection is gone or its buffer is full.
    pub fn send(&self, message: ServerMessage) -> bool {
        match self.tx.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(subscriber = %self.id, "outbound buffer full, dropping subscriber");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let (a, _rx_a) = Subscriber::channel();
        let (b, _rx_b) = Subscriber::channel();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn send_after_receiver_dropped() {
        let (sub, rx) = Subscriber::channel();
        assert!(sub.send(ServerMessage::Error {
            message: "first".into()
        }));

        drop(rx);
        assert!(sub.is_closed());
        assert!(!sub.send(ServerMessage::Error {
            message: "second".into()
        }));
    }

    #[test]
    fn send_fails_once_buffer_is_full() {
        let (sub, mut rx) = Subscriber::channel();
        for n in 0..SUBSCRIBER_BUFFER {
            assert!(sub.send(ServerMessage::Error {
                message: n.to_string()
            }));
        }
        assert!(!sub.send(ServerMessage::Error {
            message: "overflow".into()
        }));
        assert!(!sub.is_closed());

        // Draining frees room again
        assert!(rx.try_recv().is_ok());
        assert!(sub.send(ServerMessage::Error {
            message: "after".into()
        }));
    }
}
