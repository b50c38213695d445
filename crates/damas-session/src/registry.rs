//! The connection registry: every live connection and how to reach it.
//!
//! `ConnectionRegistry` is not thread-safe by itself. It lives inside the
//! lobby, which the server guards with a single mutex.

use std::collections::HashMap;

use damas_protocol::{ConnectionId, ServerEvent};

use crate::{Outbox, Session, SessionError, SessionState};

/// Tracks all live connections.
#[derive(Default)]
pub struct ConnectionRegistry {
    sessions: HashMap<ConnectionId, Session>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new connection in the [`SessionState::Lobby`] state.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyRegistered`] if the ID is live.
    pub fn register(
        &mut self,
        id: ConnectionId,
        outbox: Outbox,
    ) -> Result<(), SessionError> {
        if self.sessions.contains_key(&id) {
            return Err(SessionError::AlreadyRegistered(id));
        }
        self.sessions.insert(
            id,
            Session {
                id,
                state: SessionState::Lobby,
                outbox,
            },
        );
        tracing::debug!(%id, live = self.sessions.len(), "connection registered");
        Ok(())
    }

    /// Forgets a connection and returns what was known about it.
    ///
    /// Unregistering an unknown ID is a no-op: teardown can be reached
    /// from more than one path.
    pub fn unregister(&mut self, id: ConnectionId) -> Option<Session> {
        let removed = self.sessions.remove(&id);
        if removed.is_some() {
            tracing::debug!(%id, live = self.sessions.len(), "connection unregistered");
        }
        removed
    }

    /// Returns `true` if the connection is live.
    pub fn exists(&self, id: ConnectionId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn get(&self, id: ConnectionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    /// Moves a connection to a new lifecycle state.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`] — the connection is gone
    /// - [`SessionError::InvalidTransition`] — the move breaks the
    ///   lifecycle ordering
    pub fn set_state(
        &mut self,
        id: ConnectionId,
        state: SessionState,
    ) -> Result<(), SessionError> {
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(SessionError::NotFound(id))?;
        if !session.state.can_transition_to(&state) {
            return Err(SessionError::InvalidTransition {
                id,
                from: session.state.clone(),
                to: state,
            });
        }
        tracing::debug!(%id, from = %session.state, to = %state, "connection state changed");
        session.state = state;
        Ok(())
    }

    /// Queues an event for one connection. Returns `false` if the
    /// connection is gone or its task has stopped reading.
    pub fn send_to(&self, id: ConnectionId, event: ServerEvent) -> bool {
        match self.sessions.get(&id) {
            Some(session) => session.outbox.send(event).is_ok(),
            None => false,
        }
    }

    /// Queues an event for every live connection.
    pub fn broadcast(&self, event: &ServerEvent) {
        for session in self.sessions.values() {
            let _ = session.outbox.send(event.clone());
        }
    }

    /// Returns the number of live connections.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if no connection is live.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
