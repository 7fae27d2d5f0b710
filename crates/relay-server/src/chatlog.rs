//! The append-only chat log.
//!
//! Every message the relay handles is appended as one timestamped line.
//! Appends from concurrent sessions are serialized under a single mutex so
//! entries never interleave at the byte level, and each append reopens the
//! file, writes one complete line, and flushes before returning.
//!
//! Logging is best-effort auditing: a failed open or write is reported and
//! counted but never propagates, so message delivery continues even when
//! the log path is unwritable (and resumes logging if it becomes writable
//! again, since the file is reopened per append).

use crate::metrics;
use relay_core::Message;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

/// Serialized writer for the append-only chat log.
pub struct ChatLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ChatLog {
    /// Create a chat log writer for the given path. The file is not
    /// opened until the first append.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// The log file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one message as `[YYYY-MM-DD HH:MM:SS] <text>`.
    ///
    /// Returns only after the line is written and flushed, or after the
    /// failure has been reported. Never fails the caller.
    pub async fn append(&self, message: &Message) {
        let line = relay_wire::log_line(message.timestamp(), message.text());
        let _guard = self.lock.lock().await;
        if let Err(e) = self.write_line(&line).await {
            warn!(path = %self.path.display(), error = %e, "Chat log append failed");
            metrics::record_log_write_failure();
        }
    }

    async fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
