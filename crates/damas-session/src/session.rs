//! Session types: what the registry records about each connection.

use std::fmt;

use damas_protocol::{ConnectionId, RoomCode, ServerEvent};
use tokio::sync::mpsc;

/// Channel for delivering server events to one connection's task.
///
/// Unbounded so that enqueueing from inside the lobby lock never waits;
/// the socket write happens later in the connection's own task.
pub type Outbox = mpsc::UnboundedSender<ServerEvent>;

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Where a live connection stands in matchmaking.
///
/// ```text
///   Lobby ──→ Waiting ──→ Paired
///     │                     │
///     └───────→ Paired ─────┴──→ Lobby (room torn down)
/// ```
///
/// - **Lobby**: connected, not matched, no room. Only reachable in
///   room-code mode, or after a room is torn down.
/// - **Waiting**: holds the quick-pair slot (`room: None`) or sits alone
///   in an open room it created.
/// - **Paired**: one of the two members of a full room.
///
/// Disconnection is terminal and is modelled by removal from the
/// registry, not by a state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Lobby,
    Waiting { room: Option<RoomCode> },
    Paired { room: RoomCode },
}

impl SessionState {
    /// The room this connection belongs to, if any.
    pub fn room(&self) -> Option<&RoomCode> {
        match self {
            Self::Lobby | Self::Waiting { room: None } => None,
            Self::Waiting { room: Some(room) } | Self::Paired { room } => {
                Some(room)
            }
        }
    }

    /// Returns `true` if moving to `target` is allowed.
    pub fn can_transition_to(&self, target: &Self) -> bool {
        matches!(
            (self, target),
            (Self::Lobby, Self::Waiting { .. })
                | (Self::Lobby, Self::Paired { .. })
                | (Self::Waiting { .. }, Self::Paired { .. })
                | (Self::Paired { .. }, Self::Lobby)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::Waiting { room: None } => write!(f, "Waiting"),
            Self::Waiting { room: Some(room) } => write!(f, "Waiting({room})"),
            Self::Paired { room } => write!(f, "Paired({room})"),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A single live connection as seen by the registry.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: ConnectionId,
    pub state: SessionState,
    pub outbox: Outbox,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code() -> RoomCode {
        RoomCode::new("AB12")
    }

    #[test]
    fn test_lobby_can_wait_or_pair() {
        let lobby = SessionState::Lobby;
        assert!(lobby.can_transition_to(&SessionState::Waiting { room: None }));
        assert!(lobby.can_transition_to(&SessionState::Paired { room: code() }));
    }

    #[test]
    fn test_waiting_only_moves_to_paired() {
        let waiting = SessionState::Waiting { room: Some(code()) };
        assert!(waiting.can_transition_to(&SessionState::Paired { room: code() }));
        assert!(!waiting.can_transition_to(&SessionState::Lobby));
        assert!(!waiting.can_transition_to(&SessionState::Waiting { room: None }));
    }

    #[test]
    fn test_paired_returns_to_lobby_only() {
        let paired = SessionState::Paired { room: code() };
        assert!(paired.can_transition_to(&SessionState::Lobby));
        assert!(!paired.can_transition_to(&SessionState::Waiting { room: None }));
        assert!(!paired.can_transition_to(&SessionState::Paired { room: code() }));
    }

    #[test]
    fn test_room_of_each_state() {
        assert_eq!(SessionState::Lobby.room(), None);
        assert_eq!(SessionState::Waiting { room: None }.room(), None);
        assert_eq!(
            SessionState::Waiting { room: Some(code()) }.room(),
            Some(&code())
        );
        assert_eq!(SessionState::Paired { room: code() }.room(), Some(&code()));
    }

    #[test]
    fn test_display() {
        assert_eq!(SessionState::Lobby.to_string(), "Lobby");
        assert_eq!(
            SessionState::Paired { room: code() }.to_string(),
            "Paired(AB12)"
        );
    }
}
