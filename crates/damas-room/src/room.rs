//! A single room: a code and two seats.

use damas_protocol::{Color, ConnectionId, RoomCode};

use crate::RoomError;

/// One game session between at most two connections.
///
/// A room with one seat taken is *open* and shows up in the discovery
/// list; a room with both seats taken is *full*.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    code: RoomCode,
    white: Option<ConnectionId>,
    red: Option<ConnectionId>,
}

impl Room {
    /// A room with only the white seat taken.
    pub fn open(code: RoomCode, white: ConnectionId) -> Self {
        Self {
            code,
            white: Some(white),
            red: None,
        }
    }

    /// A room with both seats taken.
    pub fn paired(code: RoomCode, white: ConnectionId, red: ConnectionId) -> Self {
        Self {
            code,
            white: Some(white),
            red: Some(red),
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Exactly one seat is taken.
    pub fn is_open(&self) -> bool {
        self.white.is_some() != self.red.is_some()
    }

    /// Both seats are taken.
    pub fn is_full(&self) -> bool {
        self.white.is_some() && self.red.is_some()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.white == Some(id) || self.red == Some(id)
    }

    /// The side `id` plays, if it sits here.
    pub fn color_of(&self, id: ConnectionId) -> Option<Color> {
        if self.white == Some(id) {
            Some(Color::White)
        } else if self.red == Some(id) {
            Some(Color::Red)
        } else {
            None
        }
    }

    /// The other member, if `id` sits here and the other seat is taken.
    pub fn opponent_of(&self, id: ConnectionId) -> Option<ConnectionId> {
        match self.color_of(id)? {
            Color::White => self.red,
            Color::Red => self.white,
        }
    }

    /// Members in seat order, white first.
    pub fn members(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.white.iter().chain(self.red.iter()).copied()
    }

    /// Seats `id` in the first free seat and returns its color.
    ///
    /// # Errors
    /// Returns [`RoomError::RoomFull`] if both seats are taken; the room
    /// is left unchanged.
    pub(crate) fn seat(&mut self, id: ConnectionId) -> Result<Color, RoomError> {
        if self.white.is_none() {
            self.white = Some(id);
            Ok(Color::White)
        } else if self.red.is_none() {
            self.red = Some(id);
            Ok(Color::Red)
        } else {
            Err(RoomError::RoomFull(self.code.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    #[test]
    fn test_open_room_has_one_member() {
        let room = Room::open(RoomCode::new("AB12"), cid(1));
        assert!(room.is_open());
        assert!(!room.is_full());
        assert_eq!(room.members().collect::<Vec<_>>(), vec![cid(1)]);
        assert_eq!(room.opponent_of(cid(1)), None);
    }

    #[test]
    fn test_seat_fills_red_then_rejects() {
        let mut room = Room::open(RoomCode::new("AB12"), cid(1));
        assert_eq!(room.seat(cid(2)).unwrap(), Color::Red);
        assert!(room.is_full());
        assert!(!room.is_open());

        let before = room.clone();
        assert!(matches!(room.seat(cid(3)), Err(RoomError::RoomFull(_))));
        assert_eq!(room, before);
    }

    #[test]
    fn test_colors_and_opponents() {
        let room = Room::paired(RoomCode::new("AB12"), cid(1), cid(2));
        assert_eq!(room.color_of(cid(1)), Some(Color::White));
        assert_eq!(room.color_of(cid(2)), Some(Color::Red));
        assert_eq!(room.color_of(cid(3)), None);
        assert_eq!(room.opponent_of(cid(1)), Some(cid(2)));
        assert_eq!(room.opponent_of(cid(2)), Some(cid(1)));
        assert_eq!(room.opponent_of(cid(3)), None);
    }
}
