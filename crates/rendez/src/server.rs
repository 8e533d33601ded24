//! `RendezServer` builder and accept loop.
//!
//! This is the entry point for running a coordinator. It ties the
//! layers together: transport → protocol → registry.

use std::sync::Arc;

use rendez_protocol::JsonCodec;
use rendez_registry::Registry;
use rendez_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::RendezError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
///
/// The registry sits behind a single mutex: every inbound event locks
/// it, mutates to completion, and enqueues its outbound events before
/// releasing, which serializes all room mutations (run-to-completion
/// per event).
pub(crate) struct ServerState {
    pub(crate) registry: Mutex<Registry>,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a Rendez server.
pub struct RendezServerBuilder {
    bind_addr: String,
}

impl RendezServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Binds the transport and builds the server.
    pub async fn build(self) -> Result<RendezServer, RendezError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            registry: Mutex::new(Registry::new()),
            codec: JsonCodec,
        });

        Ok(RendezServer { transport, state })
    }
}

impl Default for RendezServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Rendez coordinator.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct RendezServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
}

impl RendezServer {
    /// Creates a new builder.
    pub fn builder() -> RendezServerBuilder {
        RendezServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each
    /// one. Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), RendezError> {
        tracing::info!("Rendez coordinator running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(conn, state).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
