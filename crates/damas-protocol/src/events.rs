//! The event vocabulary exchanged over a connection.
//!
//! Every frame is one JSON object naming the event and carrying its
//! payload:
//!
//! ```text
//! {"event": "init_game", "data": {"room": "K7QZ", "color": "red", "turn": false}}
//! ```
//!
//! `data` may be left out for events without a payload (`create_room`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Color, RoomCode};

// ---------------------------------------------------------------------------
// RelayPayload
// ---------------------------------------------------------------------------

/// An application payload the server forwards without interpreting.
///
/// Only `room` is read, to find the peer. Every other field is carried
/// through untouched, so the peer receives exactly the object the sender
/// sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayPayload {
    pub room: RoomCode,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl RelayPayload {
    /// Builds a payload addressed to `room` with no other fields.
    pub fn new(room: RoomCode) -> Self {
        Self {
            room,
            body: Map::new(),
        }
    }

    /// Adds a field to the opaque body.
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.body.insert(key.to_owned(), value);
        self
    }
}

// ---------------------------------------------------------------------------
// ClientEvent
// ---------------------------------------------------------------------------

/// Events a client sends to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Room-code mode: open a new room with the sender as white.
    CreateRoom,

    /// Room-code mode: take the red seat of an open room.
    JoinGame { room_code: String },

    /// Subscribe to a room's relay group. Idempotent; only honoured for
    /// the room the sender already belongs to.
    JoinSpecificRoom { room: RoomCode },

    /// A move, relayed to the opponent as `opponent_move`.
    MakeMove(RelayPayload),

    /// End of game, relayed to the opponent as `game_over`.
    GameOver(RelayPayload),
}

impl ClientEvent {
    /// The wire name of the event, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateRoom => "create_room",
            Self::JoinGame { .. } => "join_game",
            Self::JoinSpecificRoom { .. } => "join_specific_room",
            Self::MakeMove(_) => "make_move",
            Self::GameOver(_) => "game_over",
        }
    }
}

// ---------------------------------------------------------------------------
// ServerEvent
// ---------------------------------------------------------------------------

/// Events the server sends to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// No opponent yet.
    Waiting(String),

    /// A room was opened for the recipient, who plays white.
    RoomCreated { room: RoomCode, color: Color },

    /// Pairing complete. `turn` is `true` for the side that opens.
    InitGame {
        room: RoomCode,
        color: Color,
        turn: bool,
    },

    /// The codes of every open room.
    UpdateRoomList(Vec<RoomCode>),

    /// A request failed (room full, room not found, ...).
    ErrorMsg(String),

    /// The opponent's move, exactly as they sent it.
    OpponentMove(RelayPayload),

    /// The opponent's end-of-game payload, exactly as they sent it.
    GameOver(RelayPayload),

    /// The opponent disconnected and the room is gone.
    OpponentLeft { message: String },
}

impl ServerEvent {
    /// Builds the `init_game` event for one side of a pairing.
    pub fn init_game(room: RoomCode, color: Color) -> Self {
        Self::InitGame {
            room,
            turn: color.moves_first(),
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn decode(value: Value) -> ClientEvent {
        serde_json::from_value(value).expect("should decode")
    }

    #[test]
    fn test_create_room_decodes_without_data() {
        assert_eq!(decode(json!({"event": "create_room"})), ClientEvent::CreateRoom);
    }

    #[test]
    fn test_join_game_decodes_room_code() {
        let event = decode(json!({"event": "join_game", "data": {"room_code": "k7qz"}}));
        assert_eq!(
            event,
            ClientEvent::JoinGame {
                room_code: "k7qz".into()
            }
        );
    }

    #[test]
    fn test_make_move_keeps_opaque_fields() {
        let sent = json!({
            "room": "room-conn-1-conn-2",
            "move": {"from": {"r": 5, "c": 0}, "to": {"r": 4, "c": 1}},
        });
        let event = decode(json!({"event": "make_move", "data": sent.clone()}));
        let ClientEvent::MakeMove(payload) = event else {
            panic!("expected make_move, got {event:?}");
        };
        assert_eq!(payload.room.as_str(), "room-conn-1-conn-2");

        let relayed = serde_json::to_value(ServerEvent::OpponentMove(payload)).unwrap();
        assert_eq!(relayed, json!({"event": "opponent_move", "data": sent}));
    }

    #[test]
    fn test_make_move_without_room_is_rejected() {
        let result: Result<ClientEvent, _> = serde_json::from_value(
            json!({"event": "make_move", "data": {"move": 1}}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_init_game_wire_shape() {
        let event = ServerEvent::init_game(RoomCode::new("AB12"), Color::Red);
        assert_eq!(
            serde_json::to_value(event).unwrap(),
            json!({"event": "init_game", "data": {"room": "AB12", "color": "red", "turn": false}})
        );
    }

    #[test]
    fn test_string_payload_events_wire_shape() {
        assert_eq!(
            serde_json::to_value(ServerEvent::ErrorMsg("room AB12 is full".into())).unwrap(),
            json!({"event": "error_msg", "data": "room AB12 is full"})
        );
        assert_eq!(
            serde_json::to_value(ServerEvent::UpdateRoomList(vec![RoomCode::new("AB12")]))
                .unwrap(),
            json!({"event": "update_room_list", "data": ["AB12"]})
        );
    }

    #[test]
    fn test_client_event_names() {
        let payload = RelayPayload::new(RoomCode::new("AB12")).with("winner", json!("white"));
        assert_eq!(ClientEvent::GameOver(payload).name(), "game_over");
        assert_eq!(ClientEvent::CreateRoom.name(), "create_room");
    }
}
