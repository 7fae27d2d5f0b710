//! Server lifecycle: shared state, listener startup, and the accept loop.

use crate::chatlog::ChatLog;
use crate::config::Config;
use crate::session;
use anyhow::{Context, Result};
use relay_core::{Broadcaster, Registry};
use relay_transport::{Listener, TcpTransport};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared server state, one per process.
pub struct AppState {
    /// The participant registry.
    pub registry: Arc<Registry>,
    /// Fan-out over the registry.
    pub broadcaster: Broadcaster,
    /// The append-only chat log.
    pub chatlog: ChatLog,
    /// Server configuration.
    pub config: Config,
}

impl AppState {
    /// Create new app state from configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let registry = Arc::new(Registry::with_capacity(config.limits.max_participants));
        Self {
            broadcaster: Broadcaster::new(registry.clone()),
            chatlog: ChatLog::new(config.log.file.clone()),
            registry,
            config,
        }
    }
}

/// The relay server: a bound listener plus shared state.
pub struct Server {
    transport: TcpTransport,
    state: Arc<AppState>,
}

impl Server {
    /// Bind the listening socket.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or the socket cannot be
    /// bound; both are fatal at startup.
    pub async fn bind(config: Config) -> Result<Self> {
        let addr = config.bind_addr()?;
        let transport = TcpTransport::bind(addr, config.limits.read_buffer_size)
            .await
            .with_context(|| format!("Failed to bind listening socket on {addr}"))?;

        Ok(Self {
            transport,
            state: Arc::new(AppState::new(config)),
        })
    }

    /// The bound address. With port 0 in the config this is where the
    /// ephemeral port shows up.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket is unusable.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.transport.local_addr()?)
    }

    /// The participant registry, shared with every session.
    #[must_use]
    pub fn registry(&self) -> Arc<Registry> {
        self.state.registry.clone()
    }

    /// Serve forever.
    ///
    /// A failed accept attempt is reported and the loop continues; the
    /// loop only ends with the process.
    ///
    /// # Errors
    ///
    /// Returns an error only if the listening socket is unusable.
    pub async fn run(self) -> Result<()> {
        info!(
            "Relay listening on {} (chat log: {})",
            self.local_addr()?,
            self.state.config.log.file.display()
        );

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    tokio::spawn(session::run(conn, self.state.clone()));
                }
                Err(e) => {
                    warn!(error = %e, "Accept failed");
                }
            }
        }
    }
}
