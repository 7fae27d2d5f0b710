//! The per-connection participant session.
//!
//! Each accepted connection runs one session task through four phases:
//! joining (welcome, register, join announcement), active (one read = one
//! relayed message), leaving (departure announcement, unregister), closed.
//! A second task per session drains the participant's outbox into the
//! socket, so a slow peer never blocks the room's fan-out.
//!
//! Errors here are terminal for this session only; nothing a session does
//! can fail another participant beyond the departure announcement.

use crate::metrics;
use crate::server::AppState;
use bytes::Bytes;
use relay_core::{Message, Participant};
use relay_transport::{Connection, RecvHalf, SendHalf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

/// Run a session to completion.
///
/// The accept loop detaches this with `tokio::spawn`; tests await it
/// directly to observe completion.
pub async fn run(conn: Box<dyn Connection>, state: Arc<AppState>) {
    let addr = conn.remote_addr();
    let (mut recv, send) = conn.into_split();

    let (outbox_tx, outbox_rx) = mpsc::channel::<Bytes>(state.config.limits.outbox_capacity);
    let writer = tokio::spawn(write_outbox(outbox_rx, send));

    // Joining: register first, so the joiner's own outbox is part of the
    // join-announcement snapshot and it sees itself join.
    if let Err(e) = state.registry.register(Participant::new(addr, outbox_tx.clone())) {
        warn!(participant = %addr, error = %e, "Refusing connection");
        metrics::record_refusal();
        drop(outbox_tx);
        let _ = writer.await;
        return;
    }
    metrics::record_connection();

    // The outbox is empty at this point, so the welcome precedes the join
    // announcement in the participant's own stream.
    let welcome = Bytes::from(relay_wire::welcome_line(addr));
    if outbox_tx.send(welcome).await.is_err() {
        trace!(participant = %addr, "Writer gone before welcome");
    }

    let join = Message::join(addr);
    state.chatlog.append(&join).await;
    state.broadcaster.deliver(&join);
    debug!(participant = %addr, "Joined");

    // Active: one successful read is one relayed message.
    loop {
        match recv.recv().await {
            Ok(Some(chunk)) => {
                let payload = relay_wire::decode_chunk(&chunk);
                let message = Message::chat(addr, &payload);
                state.chatlog.append(&message).await;
                state.broadcaster.deliver(&message);
                metrics::record_message(chunk.len());
            }
            Ok(None) => {
                debug!(participant = %addr, "Disconnected");
                break;
            }
            Err(e) => {
                warn!(participant = %addr, error = %e, "Read failed");
                break;
            }
        }
    }

    // Leaving: announce while still snapshotted (the send to our own dead
    // socket is swallowed like any other delivery failure), then remove.
    let leave = Message::leave(addr);
    state.chatlog.append(&leave).await;
    state.broadcaster.deliver(&leave);
    state.registry.unregister(&addr);

    // Dropping the last sender lets the writer drain and close the socket.
    drop(outbox_tx);
    let _ = writer.await;
    metrics::record_disconnection();
    debug!(participant = %addr, "Session closed");
}

/// Drain the outbox into the socket until every sender is gone or the
/// write side dies.
async fn write_outbox(mut outbox: mpsc::Receiver<Bytes>, mut send: Box<dyn SendHalf>) {
    while let Some(payload) = outbox.recv().await {
        if let Err(e) = send.send(payload).await {
            trace!(error = %e, "Write failed");
            break;
        }
    }
    let _ = send.close().await;
}
