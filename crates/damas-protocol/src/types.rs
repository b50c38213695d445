//! Core protocol types: room codes, side colors, delivery targets.

use std::fmt;

use damas_transport::ConnectionId;
use rand::Rng;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomCode
// ---------------------------------------------------------------------------

/// Characters a generated room code is drawn from.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// The identifier of a room.
///
/// In room-code mode this is a short code a player can read out to a
/// friend (`K7QZ`). In quick-pair mode it is derived from both
/// connection IDs and never typed by a human.
///
/// Serialized as a bare string.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Length of a generated short code.
    pub const SHORT_LEN: usize = 4;

    /// Wraps an existing code verbatim.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Draws a random short code. Uniqueness is the caller's business:
    /// the room manager retries on collision.
    pub fn random() -> Self {
        let mut rng = rand::rng();
        let code = (0..Self::SHORT_LEN)
            .map(|_| {
                CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char
            })
            .collect();
        Self(code)
    }

    /// Derives the code for a quick-pair match. The waiting connection
    /// comes first.
    pub fn for_pair(first: ConnectionId, second: ConnectionId) -> Self {
        Self(format!("room-{first}-{second}"))
    }

    /// Cleans up a code typed by a player: surrounding whitespace is
    /// dropped and letters are upper-cased.
    pub fn normalized(input: &str) -> Self {
        Self(input.trim().to_ascii_uppercase())
    }

    /// Returns `true` if this looks like a generated short code.
    pub fn is_short_code(&self) -> bool {
        self.0.len() == Self::SHORT_LEN
            && self.0.bytes().all(|b| CODE_ALPHABET.contains(&b))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The side a player controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Red,
}

impl Color {
    /// White always opens. Fixed at pairing time, never renegotiated.
    pub fn moves_first(self) -> bool {
        matches!(self, Self::White)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "white"),
            Self::Red => write!(f, "red"),
        }
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Who should receive a server event.
///
/// Lobby operations return `(Recipient, ServerEvent)` pairs; the registry
/// resolves them to outboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// One specific connection.
    Connection(ConnectionId),

    /// Every connected client.
    All,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_code_is_short_alphanumeric() {
        for _ in 0..200 {
            let code = RoomCode::random();
            assert_eq!(code.as_str().len(), RoomCode::SHORT_LEN);
            assert!(code.is_short_code(), "bad code {code}");
        }
    }

    #[test]
    fn test_for_pair_is_deterministic_and_ordered() {
        let a = ConnectionId::new(3);
        let b = ConnectionId::new(9);
        assert_eq!(RoomCode::for_pair(a, b), RoomCode::for_pair(a, b));
        assert_ne!(RoomCode::for_pair(a, b), RoomCode::for_pair(b, a));
        assert_eq!(RoomCode::for_pair(a, b).as_str(), "room-conn-3-conn-9");
        assert!(!RoomCode::for_pair(a, b).is_short_code());
    }

    #[test]
    fn test_normalized_trims_and_uppercases() {
        assert_eq!(RoomCode::normalized("  k7qz \n"), RoomCode::new("K7QZ"));
    }

    #[test]
    fn test_room_code_serializes_as_bare_string() {
        let json = serde_json::to_string(&RoomCode::new("AB12")).unwrap();
        assert_eq!(json, r#""AB12""#);
    }

    #[test]
    fn test_color_wire_names_and_turn() {
        assert_eq!(serde_json::to_string(&Color::White).unwrap(), r#""white""#);
        assert_eq!(serde_json::to_string(&Color::Red).unwrap(), r#""red""#);
        assert!(Color::White.moves_first());
        assert!(!Color::Red.moves_first());
    }
}
