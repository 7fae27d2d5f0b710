//! # relay-wire
//!
//! Wire text formats for the relay chat protocol.
//!
//! The protocol is plain text over a stream: each successful read of a
//! chunk from a participant is one logical message. There is no length
//! prefix and no delimiter-based reassembly; a payload that spans multiple
//! reads arrives at the room as multiple messages. This is part of the
//! observed protocol contract, not an implementation shortcut.
//!
//! Outbound lines:
//!
//! - `Welcome to GroupChat! You are <ip>:<port>` (unicast, newline-terminated)
//! - `<ip>:<port> joined the chat.` (broadcast)
//! - `<ip>:<port> : <payload>` (broadcast)
//! - `<ip>:<port> left the chat.` (broadcast)
//!
//! Broadcast lines carry no trailing newline; only the welcome line does.

pub mod lines;

pub use lines::{
    chat_line, decode_chunk, join_line, leave_line, log_line, trim_leading_newlines, welcome_line,
};
