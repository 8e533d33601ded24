//! Unified error type for the Rendez server.

use rendez_protocol::ProtocolError;
use rendez_transport::TransportError;

/// Top-level error that wraps the layer-specific errors.
///
/// Registry errors never appear here: a join rejection is relayed to
/// the requesting client as a `joinError` event, not propagated as a
/// server fault.
#[derive(Debug, thiserror::Error)]
pub enum RendezError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
