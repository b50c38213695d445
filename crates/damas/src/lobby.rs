//! The lobby: every piece of matchmaking state, mutated in one place.
//!
//! `Lobby` owns the connection registry, the rooms, and the quick-pair
//! waiting slot. The server keeps it behind a single mutex, so connect,
//! event and disconnect handling are serialized against each other and a
//! waiting connection can never be paired twice.
//!
//! No operation touches a socket. Each returns the deliveries it wants
//! made, and [`Lobby::dispatch`] hands them to the recipients' outboxes.
//! The writes happen later in each connection's own task.

use damas_protocol::{
    ClientEvent, Color, ConnectionId, Recipient, RelayPayload, RoomCode,
    ServerEvent,
};
use damas_room::{
    MatchmakingConfig, MatchmakingMode, Room, RoomError, RoomManager,
    WaitingSlot,
};
use damas_session::{ConnectionRegistry, Outbox, SessionError, SessionState};

/// Sent to a quick-pair connection that has nobody to play yet.
pub const WAITING_MESSAGE: &str = "Waiting for an opponent...";

/// Sent to the member left behind when the other one disconnects.
pub const OPPONENT_LEFT_MESSAGE: &str = "Your opponent left the game.";

/// Events to deliver, each paired with who should get it.
pub type Deliveries = Vec<(Recipient, ServerEvent)>;

/// Shared matchmaking state for one server.
pub struct Lobby {
    registry: ConnectionRegistry,
    rooms: RoomManager,
    waiting: WaitingSlot,
    config: MatchmakingConfig,
}

impl Lobby {
    pub fn new(config: MatchmakingConfig) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            rooms: RoomManager::new(),
            waiting: WaitingSlot::new(),
            config,
        }
    }

    pub fn config(&self) -> &MatchmakingConfig {
        &self.config
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn rooms(&self) -> &RoomManager {
        &self.rooms
    }

    /// The connection holding the quick-pair slot, if any.
    pub fn waiting_connection(&self) -> Option<ConnectionId> {
        self.waiting.current()
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Registers a new connection and runs the matchmaking entry step.
    ///
    /// Quick-pair: the connection either takes the waiting slot or is
    /// paired with whoever holds it. Room-code: it stays in the lobby and
    /// is sent the current list of open rooms.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyRegistered`] if `id` is live.
    pub fn connect(
        &mut self,
        id: ConnectionId,
        outbox: Outbox,
    ) -> Result<Deliveries, SessionError> {
        self.registry.register(id, outbox)?;
        tracing::info!(conn_id = %id, mode = %self.config.mode, "client connected");

        let deliveries = match self.config.mode {
            MatchmakingMode::QuickPair => self.quick_pair(id),
            MatchmakingMode::RoomCode => vec![(
                Recipient::Connection(id),
                ServerEvent::UpdateRoomList(self.rooms.open_rooms()),
            )],
        };
        Ok(deliveries)
    }

    /// Handles one event from a live connection.
    ///
    /// Request failures (room full, unknown code, wrong mode) come back as
    /// an `error_msg` to the sender and leave state untouched. Events from
    /// an unknown connection are dropped.
    pub fn handle(&mut self, id: ConnectionId, event: ClientEvent) -> Deliveries {
        if !self.registry.exists(id) {
            tracing::debug!(conn_id = %id, event = event.name(), "event from unknown connection dropped");
            return Vec::new();
        }
        tracing::debug!(conn_id = %id, event = event.name(), "event received");

        let result = match event {
            ClientEvent::CreateRoom => self.create_room(id),
            ClientEvent::JoinGame { room_code } => {
                self.join_game(id, RoomCode::normalized(&room_code))
            }
            ClientEvent::JoinSpecificRoom { room } => {
                self.join_specific_room(id, &room);
                Ok(Vec::new())
            }
            ClientEvent::MakeMove(payload) => {
                let room = payload.room.clone();
                Ok(self.rooms.relay(&room, id, ServerEvent::OpponentMove(payload)))
            }
            ClientEvent::GameOver(payload) => Ok(self.game_over(id, payload)),
        };

        result.unwrap_or_else(|err| self.reject(id, &err))
    }

    /// Tears down everything `id` was part of.
    ///
    /// Clears the waiting slot if `id` held it and destroys its room. The
    /// member left behind gets exactly one `opponent_left` and goes back
    /// to the lobby. Disconnecting an unknown connection is a no-op.
    ///
    /// A quick-pair survivor is not offered the waiting slot again: the
    /// client has no event that asks for a new opponent, so it reconnects
    /// to be matched. Room-code survivors can create or join a room.
    pub fn disconnect(&mut self, id: ConnectionId) -> Deliveries {
        let Some(session) = self.registry.unregister(id) else {
            return Vec::new();
        };
        tracing::info!(conn_id = %id, state = %session.state, "client disconnected");

        if self.waiting.clear_if(id) {
            tracing::debug!(conn_id = %id, "waiting slot cleared");
        }

        let mut deliveries = Vec::new();
        if let Some(room) = self.rooms.leave(id) {
            if let Some(opponent) = room.opponent_of(id) {
                self.transition(opponent, SessionState::Lobby);
                deliveries.push((
                    Recipient::Connection(opponent),
                    ServerEvent::OpponentLeft {
                        message: OPPONENT_LEFT_MESSAGE.to_owned(),
                    },
                ));
            }
            if self.config.mode == MatchmakingMode::RoomCode {
                deliveries.push(self.room_list());
            }
        }
        deliveries
    }

    /// Queues each delivery on its recipient's outbox.
    ///
    /// Connections that are gone are skipped; their own teardown is
    /// already under way.
    pub fn dispatch(&self, deliveries: Deliveries) {
        for (recipient, event) in deliveries {
            match recipient {
                Recipient::Connection(id) => {
                    if !self.registry.send_to(id, event) {
                        tracing::debug!(conn_id = %id, "delivery to closed connection dropped");
                    }
                }
                Recipient::All => self.registry.broadcast(&event),
            }
        }
    }

    // -----------------------------------------------------------------------
    // Matchmaking
    // -----------------------------------------------------------------------

    fn quick_pair(&mut self, id: ConnectionId) -> Deliveries {
        let Some(partner) = self.waiting.offer(id) else {
            return self.wait(id);
        };

        if !self.registry.exists(partner) {
            let err = RoomError::StaleState(partner);
            tracing::warn!(conn_id = %id, error = %err, "waiting slot was stale");
            self.waiting.offer(id);
            return self.wait(id);
        }

        match self.rooms.pair(partner, id) {
            Ok(room) => {
                self.transition(partner, SessionState::Paired { room: room.clone() });
                self.transition(id, SessionState::Paired { room: room.clone() });
                vec![
                    (
                        Recipient::Connection(id),
                        ServerEvent::init_game(room.clone(), Color::Red),
                    ),
                    (
                        Recipient::Connection(partner),
                        ServerEvent::init_game(room, Color::White),
                    ),
                ]
            }
            Err(err) => {
                tracing::warn!(conn_id = %id, partner = %partner, error = %err, "pairing failed");
                self.waiting.offer(partner);
                vec![(Recipient::Connection(id), ServerEvent::ErrorMsg(err.to_string()))]
            }
        }
    }

    fn wait(&mut self, id: ConnectionId) -> Deliveries {
        self.transition(id, SessionState::Waiting { room: None });
        tracing::debug!(conn_id = %id, "waiting for an opponent");
        vec![(
            Recipient::Connection(id),
            ServerEvent::Waiting(WAITING_MESSAGE.to_owned()),
        )]
    }

    fn create_room(&mut self, id: ConnectionId) -> Result<Deliveries, RoomError> {
        self.require_mode(MatchmakingMode::RoomCode, "create_room")?;
        let room = self.rooms.create_room(id)?;
        self.transition(id, SessionState::Waiting { room: Some(room.clone()) });

        Ok(vec![
            (
                Recipient::Connection(id),
                ServerEvent::RoomCreated {
                    room,
                    color: Color::White,
                },
            ),
            self.room_list(),
        ])
    }

    fn join_game(
        &mut self,
        id: ConnectionId,
        room: RoomCode,
    ) -> Result<Deliveries, RoomError> {
        self.require_mode(MatchmakingMode::RoomCode, "join_game")?;
        let white = self.rooms.join_room(&room, id)?;
        self.transition(white, SessionState::Paired { room: room.clone() });
        self.transition(id, SessionState::Paired { room: room.clone() });

        Ok(vec![
            (
                Recipient::Connection(id),
                ServerEvent::init_game(room.clone(), Color::Red),
            ),
            (
                Recipient::Connection(white),
                ServerEvent::init_game(room, Color::White),
            ),
            self.room_list(),
        ])
    }

    fn join_specific_room(&mut self, id: ConnectionId, room: &RoomCode) {
        if self.rooms.subscribe(room, id) {
            tracing::debug!(conn_id = %id, %room, "subscribed to room");
        } else {
            tracing::debug!(conn_id = %id, %room, "subscription to foreign room ignored");
        }
    }

    /// Relays the result and, if configured, closes the sender's room.
    /// As with [`Lobby::disconnect`], quick-pair players reconnect for a
    /// new match.
    fn game_over(&mut self, id: ConnectionId, payload: RelayPayload) -> Deliveries {
        let room = payload.room.clone();
        let mut deliveries = self.rooms.relay(&room, id, ServerEvent::GameOver(payload));
        if !self.config.close_room_on_game_over {
            return deliveries;
        }

        let in_room = self
            .registry
            .get(id)
            .and_then(|session| session.state.room())
            == Some(&room);
        let finished = in_room && self.rooms.get(&room).is_some_and(Room::is_full);
        if !finished {
            return deliveries;
        }

        if let Ok(closed) = self.rooms.destroy_room(&room) {
            for member in closed.members() {
                self.transition(member, SessionState::Lobby);
            }
            tracing::info!(%room, "room closed after game over");
            if self.config.mode == MatchmakingMode::RoomCode {
                deliveries.push(self.room_list());
            }
        }
        deliveries
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Turns a failed request into deliveries. An unknown code also
    /// refreshes everyone's list, since the requester's copy was stale.
    fn reject(&self, id: ConnectionId, err: &RoomError) -> Deliveries {
        tracing::debug!(conn_id = %id, error = %err, "request rejected");
        let mut deliveries = vec![(
            Recipient::Connection(id),
            ServerEvent::ErrorMsg(err.to_string()),
        )];
        if matches!(err, RoomError::NotFound(_))
            && self.config.mode == MatchmakingMode::RoomCode
        {
            deliveries.push(self.room_list());
        }
        deliveries
    }

    fn require_mode(
        &self,
        mode: MatchmakingMode,
        event: &'static str,
    ) -> Result<(), RoomError> {
        if self.config.mode == mode {
            Ok(())
        } else {
            Err(RoomError::WrongMode {
                event,
                mode: self.config.mode,
            })
        }
    }

    fn room_list(&self) -> (Recipient, ServerEvent) {
        (
            Recipient::All,
            ServerEvent::UpdateRoomList(self.rooms.open_rooms()),
        )
    }

    /// Registry and rooms are updated under the same lock, so a refused
    /// transition means they disagree. Log it and carry on.
    fn transition(&mut self, id: ConnectionId, state: SessionState) {
        if let Err(err) = self.registry.set_state(id, state) {
            tracing::warn!(conn_id = %id, error = %err, "state transition refused");
        }
    }
}
