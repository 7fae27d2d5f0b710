//! # relay-core
//!
//! Core types and fan-out machinery for the relay group-chat server.
//!
//! This crate provides the fundamental building blocks:
//!
//! - **Participant** - A registered peer's non-owning handle (identity + outbox)
//! - **Registry** - The shared collection of currently connected participants
//! - **Broadcaster** - Snapshot-based fan-out of a message to the room
//! - **Message** - Immutable chat/announcement values
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Session   │────▶│ Broadcaster │────▶│  Registry   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │ snapshot
//!                                                ▼
//!                                         ┌─────────────┐
//!                                         │ Participant │ (outbox)
//!                                         └─────────────┘
//! ```
//!
//! The registry is the only shared mutable structure; sessions own their
//! sockets exclusively and the registry holds send handles only.

pub mod broadcast;
pub mod message;
pub mod participant;
pub mod registry;

pub use broadcast::Broadcaster;
pub use message::Message;
pub use participant::{DeliveryError, Participant, ParticipantId};
pub use registry::{Registry, RegistryError};
