//! Participant handles.
//!
//! A participant is one connected peer. Its session task owns the socket;
//! the registry holds a [`Participant`] handle, which is only an identity
//! plus a bounded outbox feeding the session's writer task. Dropping every
//! handle (plus the session's own sender) ends the writer task and closes
//! the connection.

use bytes::Bytes;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::sync::mpsc;

/// Participant identity: the transport-level remote endpoint.
///
/// Its `Display` form (`ip:port`) is the identity string used in every
/// wire line and log entry.
pub type ParticipantId = SocketAddr;

/// Delivery errors for a single participant's outbox.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The outbox is full; the peer is not draining its socket.
    #[error("outbox full for {0}")]
    OutboxFull(ParticipantId),

    /// The session's writer task has gone away.
    #[error("outbox closed for {0}")]
    OutboxClosed(ParticipantId),
}

/// A registered participant's handle.
///
/// Cheap to clone; a registry snapshot clones one handle per entry.
#[derive(Debug, Clone)]
pub struct Participant {
    addr: ParticipantId,
    outbox: mpsc::Sender<Bytes>,
}

impl Participant {
    /// Create a handle from an identity and its session's outbox sender.
    #[must_use]
    pub fn new(addr: ParticipantId, outbox: mpsc::Sender<Bytes>) -> Self {
        Self { addr, outbox }
    }

    /// The participant's identity.
    #[must_use]
    pub fn addr(&self) -> ParticipantId {
        self.addr
    }

    /// Enqueue a payload for delivery to this participant.
    ///
    /// Bounded and non-blocking: a stalled peer fills its outbox and
    /// subsequent payloads are dropped here rather than stalling fan-out
    /// to healthy peers.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::OutboxFull`] when the queue is full and
    /// [`DeliveryError::OutboxClosed`] when the session has torn down.
    pub fn send(&self, payload: Bytes) -> Result<(), DeliveryError> {
        self.outbox.try_send(payload).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryError::OutboxFull(self.addr),
            mpsc::error::TrySendError::Closed(_) => DeliveryError::OutboxClosed(self.addr),
        })
    }
}
