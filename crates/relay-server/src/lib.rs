//! # relay-server
//!
//! The `relayd` group-chat broadcast relay.
//!
//! The server accepts TCP connections, registers each peer as a
//! participant, fans every received chunk out to the whole room (sender
//! included), and appends each message to an append-only chat log.
//! See the `relay-core` crate for the registry and fan-out machinery and
//! `relay-wire` for the wire text formats.

pub mod chatlog;
pub mod config;
pub mod metrics;
pub mod server;
pub mod session;

pub use chatlog::ChatLog;
pub use config::Config;
pub use server::{AppState, Server};
