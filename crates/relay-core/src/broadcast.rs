//! Snapshot-based message fan-out.
//!
//! The broadcaster never holds the registry lock during delivery: it takes
//! a snapshot, releases the lock, then attempts a bounded send to every
//! handle in the copy. A failed send to one participant is swallowed here;
//! that participant's own session detects the dead socket on its next read
//! and performs its own teardown.

use crate::message::Message;
use crate::registry::Registry;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, trace};

/// Delivers messages to every registered participant.
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<Registry>,
}

impl Broadcaster {
    /// Create a broadcaster over the given registry.
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Fan a message out to the current registry snapshot, sender included.
    ///
    /// Returns the number of participants the payload was enqueued for.
    pub fn deliver(&self, message: &Message) -> usize {
        self.deliver_bytes(message.payload())
    }

    /// Fan raw payload bytes out to the current registry snapshot.
    pub fn deliver_bytes(&self, payload: Bytes) -> usize {
        let snapshot = self.registry.snapshot();
        let mut delivered = 0;

        for participant in &snapshot {
            match participant.send(payload.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    // The failing peer's session self-heals on its next read.
                    debug!(error = %e, "Dropped delivery");
                }
            }
        }

        trace!(recipients = delivered, of = snapshot.len(), "Delivered");
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::Participant;
    use tokio::sync::mpsc;

    fn join(registry: &Registry, port: u16) -> mpsc::Receiver<Bytes> {
        let (tx, rx) = mpsc::channel(8);
        let addr = format!("127.0.0.1:{port}").parse().unwrap();
        registry.register(Participant::new(addr, tx)).unwrap();
        rx
    }

    #[tokio::test]
    async fn test_deliver_reaches_everyone_including_sender() {
        let registry = Arc::new(Registry::new());
        let mut rx_a = join(&registry, 1000);
        let mut rx_b = join(&registry, 1001);

        let sender = "127.0.0.1:1000".parse().unwrap();
        let broadcaster = Broadcaster::new(registry);
        let count = broadcaster.deliver(&Message::chat(sender, "hello"));

        assert_eq!(count, 2);
        assert_eq!(&rx_a.recv().await.unwrap()[..], b"127.0.0.1:1000 : hello");
        assert_eq!(&rx_b.recv().await.unwrap()[..], b"127.0.0.1:1000 : hello");
    }

    #[tokio::test]
    async fn test_dead_outbox_does_not_stop_fanout() {
        let registry = Arc::new(Registry::new());
        let rx_dead = join(&registry, 1000);
        drop(rx_dead);
        let mut rx_live = join(&registry, 1001);

        let broadcaster = Broadcaster::new(registry.clone());
        let count = broadcaster.deliver_bytes(Bytes::from_static(b"ping"));

        // The closed outbox is skipped, the healthy one still receives.
        assert_eq!(count, 1);
        assert_eq!(&rx_live.recv().await.unwrap()[..], b"ping");
        // The dead entry stays registered until its session unregisters it.
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_full_outbox_drops_without_blocking() {
        let registry = Arc::new(Registry::new());
        let (tx, mut rx) = mpsc::channel(1);
        let addr: std::net::SocketAddr = "127.0.0.1:1000".parse().unwrap();
        registry.register(Participant::new(addr, tx)).unwrap();

        let broadcaster = Broadcaster::new(registry);
        assert_eq!(broadcaster.deliver_bytes(Bytes::from_static(b"one")), 1);
        assert_eq!(broadcaster.deliver_bytes(Bytes::from_static(b"two")), 0);

        assert_eq!(&rx.recv().await.unwrap()[..], b"one");
    }

    #[tokio::test]
    async fn test_deliver_to_empty_room() {
        let registry = Arc::new(Registry::new());
        let broadcaster = Broadcaster::new(registry);
        assert_eq!(broadcaster.deliver_bytes(Bytes::from_static(b"void")), 0);
    }
}
