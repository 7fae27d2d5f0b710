//! # relay-transport
//!
//! Transport abstraction layer for the relay.
//!
//! The server talks to its peers through the `Listener`/`Connection`
//! traits rather than TCP types directly. The session state machine only
//! ever sees `recv()` returning chunks; putting that call behind a trait
//! is what lets a read-timeout policy be injected later without touching
//! the state machine (today reads block indefinitely, matching the
//! observed protocol contract).
//!
//! ```rust,ignore
//! use relay_transport::{Listener, TcpTransport};
//!
//! let transport = TcpTransport::bind(addr, 1024).await?;
//! loop {
//!     let conn = transport.accept().await?;
//!     // spawn a session for conn
//! }
//! ```

pub mod tcp;
pub mod traits;

pub use tcp::{TcpConnection, TcpTransport};
pub use traits::{Connection, Listener, RecvHalf, SendHalf, TransportError};
