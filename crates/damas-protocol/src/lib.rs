//! Wire protocol for the damas relay.
//!
//! - **Types** ([`RoomCode`], [`Color`], [`Recipient`]) — identities and
//!   routing targets shared by every layer above.
//! - **Events** ([`ClientEvent`], [`ServerEvent`], [`RelayPayload`]) — the
//!   named events clients and server exchange.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how events become frames.
//!
//! ```text
//! Transport (frames) → Protocol (events) → Registry / Rooms
//! ```
//!
//! The relay never interprets move or end-of-game payloads; it only needs
//! the `room` field to know where to forward them.

mod codec;
mod error;
mod events;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use events::{ClientEvent, RelayPayload, ServerEvent};
pub use types::{Color, Recipient, RoomCode};

// Connection identity is owned by the transport; re-exported so upper
// layers have one import path for it.
pub use damas_transport::ConnectionId;
