//! The participant registry.
//!
//! The registry is the single shared-mutable-state boundary in the relay.
//! One critical section covers `register`, `unregister`, and `snapshot`,
//! so a snapshot never observes a half-added or half-removed participant.
//! Callers always receive an owned copy and iterate it with no lock held;
//! no I/O ever happens inside the critical section.

use crate::participant::{Participant, ParticipantId};
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

/// Default participant capacity.
pub const DEFAULT_CAPACITY: usize = 100;

/// Registry errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The configured participant capacity is reached; the caller must
    /// refuse the connection.
    #[error("registry full ({capacity} participants)")]
    Full {
        /// The configured capacity that was hit.
        capacity: usize,
    },
}

/// The shared collection of currently connected participants.
pub struct Registry {
    inner: Mutex<HashMap<ParticipantId, Participant>>,
    capacity: usize,
}

impl Registry {
    /// Create a registry with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a registry bounded at `capacity` participants.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    /// Add a participant.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Full`] when the configured capacity is
    /// reached. Re-registering the same identity replaces the old handle;
    /// identities are remote endpoints, so this only happens after the
    /// previous session for that endpoint has exited.
    pub fn register(&self, participant: Participant) -> Result<(), RegistryError> {
        let mut inner = self.inner.lock().expect("registry lock poisoned");
        if inner.len() >= self.capacity && !inner.contains_key(&participant.addr()) {
            return Err(RegistryError::Full {
                capacity: self.capacity,
            });
        }
        let addr = participant.addr();
        inner.insert(addr, participant);
        debug!(participant = %addr, count = inner.len(), "Registered");
        Ok(())
    }

    /// Remove a participant. Idempotent: removing an absent identity is a
    /// no-op, not an error.
    pub fn unregister(&self, addr: &ParticipantId) {
        let mut inner = self.inner.lock().expect("registry lock poisoned");
        if inner.remove(addr).is_some() {
            debug!(participant = %addr, count = inner.len(), "Unregistered");
        }
    }

    /// Point-in-time copy of the current participants.
    ///
    /// Safe to iterate during delivery; the lock is released before this
    /// returns (copy-then-release, never hold-lock-during-I/O).
    #[must_use]
    pub fn snapshot(&self) -> Vec<Participant> {
        let inner = self.inner.lock().expect("registry lock poisoned");
        inner.values().cloned().collect()
    }

    /// Number of registered participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().expect("registry lock poisoned").len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use tokio::sync::mpsc;

    fn participant(port: u16) -> (Participant, mpsc::Receiver<Bytes>) {
        let (tx, rx) = mpsc::channel(8);
        let addr = format!("127.0.0.1:{port}").parse().unwrap();
        (Participant::new(addr, tx), rx)
    }

    #[test]
    fn test_register_and_snapshot() {
        let registry = Registry::new();
        let (a, _rx_a) = participant(1000);
        let (b, _rx_b) = participant(1001);

        registry.register(a).unwrap();
        registry.register(b).unwrap();

        let snap = registry.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unregister_idempotent() {
        let registry = Registry::new();
        let (a, _rx) = participant(1000);
        let addr = a.addr();

        registry.register(a).unwrap();
        registry.unregister(&addr);
        assert!(registry.is_empty());

        // Second removal is a no-op.
        registry.unregister(&addr);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registry_full() {
        let registry = Registry::with_capacity(2);
        let (a, _ra) = participant(1000);
        let (b, _rb) = participant(1001);
        let (c, _rc) = participant(1002);

        registry.register(a).unwrap();
        registry.register(b).unwrap();
        assert!(matches!(
            registry.register(c),
            Err(RegistryError::Full { capacity: 2 })
        ));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let registry = Registry::new();
        let (a, _rx) = participant(1000);
        let addr = a.addr();
        registry.register(a).unwrap();

        let snap = registry.snapshot();
        registry.unregister(&addr);

        // The earlier snapshot is unaffected by later mutation.
        assert_eq!(snap.len(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_drains_after_churn() {
        let registry = Registry::with_capacity(50);
        let mut rxs = Vec::new();
        let addrs: Vec<_> = (0..50)
            .map(|i| {
                let (p, rx) = participant(2000 + i);
                let addr = p.addr();
                registry.register(p).unwrap();
                rxs.push(rx);
                addr
            })
            .collect();

        assert_eq!(registry.len(), 50);
        for addr in &addrs {
            registry.unregister(addr);
        }
        assert!(registry.is_empty());
    }
}
