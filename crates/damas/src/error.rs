//! Unified error type for the Damas server.

use damas_protocol::ProtocolError;
use damas_room::RoomError;
use damas_session::SessionError;
use damas_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum DamasError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A registry error (duplicate id, bad state transition).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A room error (full, not found, wrong mode).
    #[error(transparent)]
    Room(#[from] RoomError),
}
