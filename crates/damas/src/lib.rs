//! # Damas
//!
//! Matchmaking and move-relay server for two-player checkers.
//!
//! The server pairs connections into rooms, tells each side its color and
//! whether it moves first, and forwards moves between the two members of a
//! room without looking at them. Board state and rules live in the client.
//!
//! Two matchmaking strategies are available:
//!
//! - **quick-pair** — the first connection waits, the next one is paired
//!   with it
//! - **room-code** — a player opens a room under a short code and a friend
//!   joins it; the list of open rooms is pushed to everyone
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use damas::prelude::*;
//!
//! # async fn start() -> Result<(), DamasError> {
//! let server = DamasServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .matchmaking(MatchmakingConfig::with_mode(MatchmakingMode::RoomCode))
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

pub mod config;
mod error;
mod handler;
pub mod lobby;
mod server;

pub use config::ServerConfig;
pub use error::DamasError;
pub use lobby::Lobby;
pub use server::{DamasServer, DamasServerBuilder};

/// Everything needed to start a server or talk to one in tests.
pub mod prelude {
    pub use crate::config::ServerConfig;
    pub use crate::lobby::{Deliveries, Lobby, OPPONENT_LEFT_MESSAGE, WAITING_MESSAGE};
    pub use crate::{DamasError, DamasServer, DamasServerBuilder};

    pub use damas_protocol::{
        ClientEvent, Codec, Color, ConnectionId, JsonCodec, Recipient,
        RelayPayload, RoomCode, ServerEvent,
    };
    pub use damas_room::{MatchmakingConfig, MatchmakingMode};
}
