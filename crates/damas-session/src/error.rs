//! Error types for the registry.

use damas_protocol::ConnectionId;

use crate::SessionState;

/// Errors that can occur while tracking connections.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A connection with this ID is already registered.
    #[error("connection {0} is already registered")]
    AlreadyRegistered(ConnectionId),

    /// No live connection has this ID.
    #[error("connection {0} not found")]
    NotFound(ConnectionId),

    /// The requested lifecycle move is not allowed.
    #[error("connection {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: ConnectionId,
        from: SessionState,
        to: SessionState,
    },
}
