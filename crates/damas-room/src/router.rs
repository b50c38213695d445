//! Event router: fans a relayed event out to the rest of a room's group.
//!
//! The router never looks inside the event and never creates or destroys
//! rooms. A code with no group (never existed, or already torn down)
//! simply has nobody to deliver to.

use damas_protocol::{ConnectionId, Recipient, RoomCode, ServerEvent};

use crate::RoomManager;

impl RoomManager {
    /// Returns one delivery of `event` per subscriber of `room`, skipping
    /// `sender`. The sender never receives its own event.
    pub fn relay(
        &self,
        room: &RoomCode,
        sender: ConnectionId,
        event: ServerEvent,
    ) -> Vec<(Recipient, ServerEvent)> {
        let Some(group) = self.groups.get(room) else {
            tracing::debug!(%room, %sender, "relay to unknown room dropped");
            return Vec::new();
        };

        let mut targets: Vec<ConnectionId> = group
            .iter()
            .copied()
            .filter(|id| *id != sender)
            .collect();
        targets.sort();

        targets
            .into_iter()
            .map(|id| (Recipient::Connection(id), event.clone()))
            .collect()
    }
}
