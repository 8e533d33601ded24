//! Transport abstraction layer for Rendez.
//!
//! Provides the [`Transport`] and [`Connection`] traits that the
//! coordinator builds on, plus the WebSocket implementation. The
//! transport's job is narrow: accept connections, hand each one an
//! opaque [`ClientId`], and move text frames in both directions. It
//! knows nothing about rooms or events.
//!
//! [`ClientId`]: rendez_protocol::ClientId

#![allow(async_fn_in_trait)]

mod error;
mod websocket;

pub use error::TransportError;
pub use websocket::{WebSocketConnection, WebSocketTransport};

use rendez_protocol::ClientId;

/// Accepts new incoming connections.
pub trait Transport: Send + Sync + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for and accepts the next incoming connection.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;
}

/// A single connection that can send and receive text frames.
///
/// Implementations are cheaply cloneable so one task can pump outbound
/// frames while another reads inbound ones.
pub trait Connection: Send + Sync + Clone + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends a text frame to the remote peer.
    fn send(
        &self,
        frame: &str,
    ) -> impl std::future::Future<Output = Result<(), Self::Error>> + Send;

    /// Receives the next text frame from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    fn recv(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<String>, Self::Error>> + Send;

    /// Closes the connection.
    fn close(
        &self,
    ) -> impl std::future::Future<Output = Result<(), Self::Error>> + Send;

    /// Returns the opaque identifier for this connection.
    fn id(&self) -> ClientId;
}
