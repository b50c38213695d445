//! Error types for the room layer.

use damas_protocol::{ConnectionId, RoomCode};

use crate::MatchmakingMode;

/// Errors that can occur during room operations.
///
/// All of them are recoverable by the client: the lobby reports them with
/// an `error_msg` and leaves state untouched.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room has this code.
    #[error("room {0} not found")]
    NotFound(RoomCode),

    /// Both seats are taken.
    #[error("room {0} is full")]
    RoomFull(RoomCode),

    /// The connection already sits in a room.
    #[error("{0} is already in room {1}")]
    AlreadyInRoom(ConnectionId, RoomCode),

    /// The connection is no longer live, e.g. it disconnected while a
    /// pairing that named it was being made.
    #[error("{0} is no longer connected")]
    StaleState(ConnectionId),

    /// The request belongs to the other matchmaking strategy.
    #[error("{event} is not available in {mode} mode")]
    WrongMode {
        event: &'static str,
        mode: MatchmakingMode,
    },
}
