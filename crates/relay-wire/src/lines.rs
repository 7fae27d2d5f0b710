//! Line construction and inbound chunk handling.

use chrono::{DateTime, Local};
use std::net::SocketAddr;

/// Build the one-time welcome line sent to a joining participant.
///
/// This is the only newline-terminated line in the protocol.
#[must_use]
pub fn welcome_line(addr: SocketAddr) -> String {
    format!("Welcome to GroupChat! You are {addr}\n")
}

/// Build the join announcement broadcast when a participant registers.
#[must_use]
pub fn join_line(addr: SocketAddr) -> String {
    format!("{addr} joined the chat.")
}

/// Build the departure announcement broadcast when a participant disconnects.
#[must_use]
pub fn leave_line(addr: SocketAddr) -> String {
    format!("{addr} left the chat.")
}

/// Build a tagged chat line from a decoded payload.
#[must_use]
pub fn chat_line(addr: SocketAddr, payload: &str) -> String {
    format!("{addr} : {payload}")
}

/// Format a chat-log entry: `[YYYY-MM-DD HH:MM:SS] <text>`, newline-terminated.
#[must_use]
pub fn log_line(timestamp: DateTime<Local>, text: &str) -> String {
    format!("[{}] {}\n", timestamp.format("%Y-%m-%d %H:%M:%S"), text)
}

/// Strip leading carriage-return and newline bytes from an inbound chunk.
///
/// Interior and trailing newlines are preserved untouched.
#[must_use]
pub fn trim_leading_newlines(chunk: &[u8]) -> &[u8] {
    let start = chunk
        .iter()
        .position(|b| *b != b'\r' && *b != b'\n')
        .unwrap_or(chunk.len());
    &chunk[start..]
}

/// Decode one inbound chunk into a message payload.
///
/// Leading CR/LF bytes are stripped, then the remainder is decoded as
/// lossy UTF-8. An all-newline chunk decodes to an empty payload, which
/// still produces a chat message upstream.
#[must_use]
pub fn decode_chunk(chunk: &[u8]) -> String {
    String::from_utf8_lossy(trim_leading_newlines(chunk)).into_owned()
}
