//! Connection registry for the damas relay.
//!
//! Tracks every live connection by its [`ConnectionId`], the outbox used
//! to reach it, and where it stands in its lifecycle:
//!
//! ```text
//! Lobby / Waiting / Paired  ──(transport close)──→  removed (terminal)
//! ```
//!
//! The registry knows nothing about matchmaking; the lobby above decides
//! when a connection moves between states.
//!
//! [`ConnectionId`]: damas_protocol::ConnectionId

mod error;
mod registry;
mod session;

pub use error::SessionError;
pub use registry::ConnectionRegistry;
pub use session::{Outbox, Session, SessionState};
