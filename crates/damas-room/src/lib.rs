//! Rooms, matchmaking and event routing for the damas relay.
//!
//! A room is two seats, white and red. Rooms are created by an explicit
//! `create_room` (room-code mode) or when a second connection arrives
//! while one is waiting (quick-pair mode), and destroyed the moment a
//! member leaves.
//!
//! # Key types
//!
//! - [`RoomManager`] — owns every room, the member index and the relay
//!   groups; its `relay` method is the event router
//! - [`Room`] — one room's two seats
//! - [`WaitingSlot`] — the single quick-pair waiting seat
//! - [`MatchmakingConfig`] — which strategy the server runs

mod config;
mod error;
mod manager;
mod room;
mod router;
mod waiting;

pub use config::{MatchmakingConfig, MatchmakingMode};
pub use error::RoomError;
pub use manager::RoomManager;
pub use room::Room;
pub use waiting::WaitingSlot;
