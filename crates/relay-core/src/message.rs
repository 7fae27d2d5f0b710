//! Chat message values.
//!
//! A [`Message`] is produced once by a session (on join, on each read, and
//! on leave), consumed by exactly one log append and one broadcast fan-out,
//! and never mutated after construction.

use crate::participant::ParticipantId;
use bytes::Bytes;
use chrono::{DateTime, Local};

/// An immutable chat or announcement message.
#[derive(Debug, Clone)]
pub struct Message {
    sender: ParticipantId,
    text: String,
    timestamp: DateTime<Local>,
}

impl Message {
    fn new(sender: ParticipantId, text: String) -> Self {
        Self {
            sender,
            text,
            timestamp: Local::now(),
        }
    }

    /// A tagged chat message: `<ip>:<port> : <payload>`.
    ///
    /// The payload must already be decoded and trimmed of leading CR/LF
    /// (see [`relay_wire::decode_chunk`]).
    #[must_use]
    pub fn chat(sender: ParticipantId, payload: &str) -> Self {
        Self::new(sender, relay_wire::chat_line(sender, payload))
    }

    /// A join announcement: `<ip>:<port> joined the chat.`
    #[must_use]
    pub fn join(sender: ParticipantId) -> Self {
        Self::new(sender, relay_wire::join_line(sender))
    }

    /// A departure announcement: `<ip>:<port> left the chat.`
    #[must_use]
    pub fn leave(sender: ParticipantId) -> Self {
        Self::new(sender, relay_wire::leave_line(sender))
    }

    /// The originating participant.
    #[must_use]
    pub fn sender(&self) -> ParticipantId {
        self.sender
    }

    /// The broadcast text (no trailing newline).
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// When the message was constructed; this is the timestamp that the
    /// chat log records.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// The bytes broadcast to every participant.
    #[must_use]
    pub fn payload(&self) -> Bytes {
        Bytes::from(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> ParticipantId {
        "192.168.1.5:50000".parse().unwrap()
    }

    #[test]
    fn test_chat_text() {
        let msg = Message::chat(sender(), "hello");
        assert_eq!(msg.text(), "192.168.1.5:50000 : hello");
        assert_eq!(msg.sender(), sender());
        assert_eq!(&msg.payload()[..], b"192.168.1.5:50000 : hello");
    }

    #[test]
    fn test_announcements() {
        assert_eq!(
            Message::join(sender()).text(),
            "192.168.1.5:50000 joined the chat."
        );
        assert_eq!(
            Message::leave(sender()).text(),
            "192.168.1.5:50000 left the chat."
        );
    }

    #[test]
    fn test_payload_has_no_trailing_newline() {
        let msg = Message::chat(sender(), "hi\n");
        // Interior/trailing newlines in the payload are the sender's own;
        // the relay adds none.
        assert_eq!(&msg.payload()[..], b"192.168.1.5:50000 : hi\n");
        assert!(!Message::join(sender()).payload().ends_with(b"\n"));
    }
}
