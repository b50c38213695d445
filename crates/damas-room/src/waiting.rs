//! The quick-pair waiting seat.

use damas_protocol::ConnectionId;

/// At most one connection waiting for an opponent.
///
/// First come, first served: whoever waits is paired with the next
/// connection to arrive and plays white.
#[derive(Debug, Default)]
pub struct WaitingSlot {
    waiting: Option<ConnectionId>,
}

impl WaitingSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers `id` for pairing.
    ///
    /// If the seat is empty, `id` takes it and `None` is returned. If it
    /// is taken, the seat is cleared and the waiting connection is
    /// returned as `id`'s partner.
    pub fn offer(&mut self, id: ConnectionId) -> Option<ConnectionId> {
        match self.waiting {
            Some(partner) if partner != id => {
                self.waiting = None;
                Some(partner)
            }
            _ => {
                self.waiting = Some(id);
                None
            }
        }
    }

    /// Clears the seat if `id` holds it. Returns whether it did.
    pub fn clear_if(&mut self, id: ConnectionId) -> bool {
        if self.waiting == Some(id) {
            self.waiting = None;
            true
        } else {
            false
        }
    }

    /// The connection currently waiting, if any.
    pub fn current(&self) -> Option<ConnectionId> {
        self.waiting
    }
}
