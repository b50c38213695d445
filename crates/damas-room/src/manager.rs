//! Room manager: creates, tracks, and tears down rooms.

use std::collections::{HashMap, HashSet};

use damas_protocol::{Color, ConnectionId, RoomCode};

use crate::{Room, RoomError};

/// Manages all active rooms and tracks which connection sits where.
///
/// Two kinds of membership are kept apart:
///
/// - **seats** (`rooms` + `member_rooms`): the logical pairing. A
///   connection sits in at most ONE room at a time.
/// - **groups**: who receives relayed events for a room code. The manager
///   subscribes every member when it seats them and drops the group with
///   the room, so the two never drift.
#[derive(Default)]
pub struct RoomManager {
    /// Active rooms, keyed by code.
    rooms: HashMap<RoomCode, Room>,

    /// Maps each seated connection to its room.
    member_rooms: HashMap<ConnectionId, RoomCode>,

    /// Relay subscriptions per room code.
    pub(crate) groups: HashMap<RoomCode, HashSet<ConnectionId>>,
}

impl RoomManager {
    /// Creates a new, empty room manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a room under a fresh short code with `owner` as white.
    ///
    /// # Errors
    /// Returns [`RoomError::AlreadyInRoom`] if `owner` is seated elsewhere.
    pub fn create_room(
        &mut self,
        owner: ConnectionId,
    ) -> Result<RoomCode, RoomError> {
        self.ensure_unseated(owner)?;
        let code = generate_unique_room_code(&self.rooms);
        self.insert(Room::open(code.clone(), owner));
        tracing::info!(room = %code, %owner, "room created");
        Ok(code)
    }

    /// Creates a full room for a quick-pair match. `white` is the
    /// connection that waited, `red` the one that just arrived.
    ///
    /// # Errors
    /// Returns [`RoomError::AlreadyInRoom`] if either side is seated.
    pub fn pair(
        &mut self,
        white: ConnectionId,
        red: ConnectionId,
    ) -> Result<RoomCode, RoomError> {
        self.ensure_unseated(white)?;
        self.ensure_unseated(red)?;
        let code = RoomCode::for_pair(white, red);
        self.insert(Room::paired(code.clone(), white, red));
        tracing::info!(room = %code, %white, %red, "players paired");
        Ok(code)
    }

    /// Seats `joiner` in the red seat of an open room and returns the
    /// white player.
    ///
    /// # Errors
    /// - [`RoomError::NotFound`] — no room has this code
    /// - [`RoomError::AlreadyInRoom`] — `joiner` is seated somewhere
    /// - [`RoomError::RoomFull`] — both seats are taken; nothing changes
    pub fn join_room(
        &mut self,
        code: &RoomCode,
        joiner: ConnectionId,
    ) -> Result<ConnectionId, RoomError> {
        if !self.rooms.contains_key(code) {
            return Err(RoomError::NotFound(code.clone()));
        }
        self.ensure_unseated(joiner)?;

        let room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;
        let color = room.seat(joiner)?;
        let opponent = room
            .opponent_of(joiner)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;

        self.member_rooms.insert(joiner, code.clone());
        self.groups.entry(code.clone()).or_default().insert(joiner);
        tracing::info!(room = %code, %joiner, %color, "player joined room");
        Ok(opponent)
    }

    /// Subscribes `id` to the relay group of `code`.
    ///
    /// Idempotent. Only a member of the room may subscribe; anything else
    /// returns `false` and changes nothing.
    pub fn subscribe(&mut self, code: &RoomCode, id: ConnectionId) -> bool {
        if self.member_rooms.get(&id) != Some(code) {
            return false;
        }
        self.groups.entry(code.clone()).or_default().insert(id);
        true
    }

    /// Tears down the room `id` sits in and returns it, so the caller
    /// can notify whoever is left. `None` if `id` was not seated.
    pub fn leave(&mut self, id: ConnectionId) -> Option<Room> {
        let code = self.member_rooms.get(&id)?.clone();
        self.destroy_room(&code).ok()
    }

    /// Removes a room, its group, and every member index entry. The code
    /// is free for reuse as soon as this returns.
    ///
    /// # Errors
    /// Returns [`RoomError::NotFound`] if no room has this code.
    pub fn destroy_room(&mut self, code: &RoomCode) -> Result<Room, RoomError> {
        let room = self
            .rooms
            .remove(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;
        for member in room.members() {
            self.member_rooms.remove(&member);
        }
        self.groups.remove(code);
        tracing::info!(room = %code, "room destroyed");
        Ok(room)
    }

    /// Codes of every open room (one seat taken), sorted.
    pub fn open_rooms(&self) -> Vec<RoomCode> {
        let mut codes: Vec<RoomCode> = self
            .rooms
            .values()
            .filter(|room| room.is_open())
            .map(|room| room.code().clone())
            .collect();
        codes.sort();
        codes
    }

    /// Returns the room `id` sits in, if any.
    pub fn room_of(&self, id: ConnectionId) -> Option<&Room> {
        self.member_rooms
            .get(&id)
            .and_then(|code| self.rooms.get(code))
    }

    /// The color `id` plays in its room.
    pub fn color_of(&self, id: ConnectionId) -> Option<Color> {
        self.room_of(id).and_then(|room| room.color_of(id))
    }

    pub fn get(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    /// Returns the number of active rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn ensure_unseated(&self, id: ConnectionId) -> Result<(), RoomError> {
        match self.member_rooms.get(&id) {
            Some(code) => Err(RoomError::AlreadyInRoom(id, code.clone())),
            None => Ok(()),
        }
    }

    fn insert(&mut self, room: Room) {
        let code = room.code().clone();
        let group = self.groups.entry(code.clone()).or_default();
        for member in room.members() {
            self.member_rooms.insert(member, code.clone());
            group.insert(member);
        }
        self.rooms.insert(code, room);
    }
}

/// Generate a unique room code, retrying on collision with existing rooms.
fn generate_unique_room_code(existing: &HashMap<RoomCode, Room>) -> RoomCode {
    loop {
        let code = RoomCode::random();
        if !existing.contains_key(&code) {
            return code;
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
    fn test_insert_keeps_indexes_in_sync() {
        let mut mgr = RoomManager::new();
        let code = mgr.pair(cid(1), cid(2)).unwrap();

        assert_eq!(mgr.room_of(cid(1)).map(Room::code), Some(&code));
        assert_eq!(mgr.room_of(cid(2)).map(Room::code), Some(&code));
        let group = &mgr.groups[&code];
        assert!(group.contains(&cid(1)) && group.contains(&cid(2)));
    }

    #[test]
    fn test_destroy_clears_every_index() {
        let mut mgr = RoomManager::new();
        let code = mgr.pair(cid(1), cid(2)).unwrap();

        mgr.destroy_room(&code).unwrap();

        assert!(mgr.room_of(cid(1)).is_none());
        assert!(mgr.room_of(cid(2)).is_none());
        assert!(!mgr.groups.contains_key(&code));
        assert_eq!(mgr.room_count(), 0);
    }

    #[test]
    fn test_subscribe_is_idempotent_for_members() {
        let mut mgr = RoomManager::new();
        let code = mgr.pair(cid(1), cid(2)).unwrap();

        assert!(mgr.subscribe(&code, cid(2)));
        assert!(mgr.subscribe(&code, cid(2)));
        assert_eq!(mgr.groups[&code].len(), 2);
    }

    #[test]
    fn test_subscribe_rejects_outsiders() {
        let mut mgr = RoomManager::new();
        let code = mgr.pair(cid(1), cid(2)).unwrap();

        assert!(!mgr.subscribe(&code, cid(3)));
        assert!(!mgr.subscribe(&RoomCode::new("ZZZZ"), cid(1)));
        assert!(!mgr.groups[&code].contains(&cid(3)));
    }
}
