//! Transport abstraction traits.
//!
//! These traits define the interface a transport must provide, keeping the
//! server and session code transport-agnostic.

use async_trait::async_trait;
use bytes::Bytes;
use std::net::SocketAddr;
use thiserror::Error;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The peer closed or reset the connection.
    #[error("connection closed")]
    ConnectionClosed,

    /// Failed to send data.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A listener that accepts inbound connections.
///
/// A single failed accept is recoverable at the call site; only a bind
/// failure (at construction) is fatal.
#[async_trait]
pub trait Listener: Send + Sync {
    /// Accept the next connection.
    ///
    /// # Errors
    ///
    /// Returns an error for a failed accept attempt; the caller is
    /// expected to report it and keep serving.
    async fn accept(&self) -> Result<Box<dyn Connection>, TransportError>;

    /// The local address the listener is bound to.
    fn local_addr(&self) -> Result<SocketAddr, TransportError>;
}

/// A bidirectional connection to one participant.
pub trait Connection: Send {
    /// The remote endpoint, which doubles as the participant identity.
    fn remote_addr(&self) -> SocketAddr;

    /// Split into independently owned read and write halves so that a
    /// writer task can run concurrently with the blocking read loop.
    fn into_split(self: Box<Self>) -> (Box<dyn RecvHalf>, Box<dyn SendHalf>);
}

/// The receiving half of a connection.
#[async_trait]
pub trait RecvHalf: Send {
    /// Receive one chunk.
    ///
    /// One successful read is one logical message; chunks are capped at
    /// the transport's configured buffer size and never reassembled.
    /// Returns `Ok(None)` on clean EOF. Blocks indefinitely; timeout
    /// policy, if ever wanted, is injected by wrapping this trait.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying read fails; the caller
    /// treats it the same as EOF.
    async fn recv(&mut self) -> Result<Option<Bytes>, TransportError>;
}

/// The sending half of a connection.
#[async_trait]
pub trait SendHalf: Send {
    /// Write the payload in full.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails; delivery errors are
    /// swallowed by the caller, the peer's own session detects the
    /// dead socket.
    async fn send(&mut self, payload: Bytes) -> Result<(), TransportError>;

    /// Shut down the write side.
    ///
    /// # Errors
    ///
    /// Returns an error when the shutdown fails.
    async fn close(&mut self) -> Result<(), TransportError>;
}
