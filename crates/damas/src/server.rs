//! `DamasServer` builder and accept loop.
//!
//! This is the entry point for running a relay server. It ties the layers
//! together: transport → protocol → lobby (registry + rooms).

use std::sync::Arc;

use damas_protocol::{Codec, JsonCodec};
use damas_room::MatchmakingConfig;
use damas_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::DamasError;
use crate::handler::handle_connection;
use crate::lobby::Lobby;

/// Shared server state passed to each connection handler task.
///
/// All matchmaking state sits behind the one `lobby` mutex. Handlers hold
/// it only while mutating; socket writes happen outside it.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) lobby: Mutex<Lobby>,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a server.
///
/// # Example
///
/// ```rust,ignore
/// use damas::prelude::*;
///
/// let server = DamasServer::builder()
///     .bind("0.0.0.0:8080")
///     .matchmaking(MatchmakingConfig::with_mode(MatchmakingMode::RoomCode))
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct DamasServerBuilder {
    bind_addr: String,
    matchmaking: MatchmakingConfig,
}

impl DamasServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            matchmaking: MatchmakingConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the matchmaking strategy and options.
    pub fn matchmaking(mut self, config: MatchmakingConfig) -> Self {
        self.matchmaking = config;
        self
    }

    /// Binds the listener and builds the server.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build(self) -> Result<DamasServer<JsonCodec>, DamasError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        tracing::info!(
            addr = %self.bind_addr,
            mode = %self.matchmaking.mode,
            "server bound"
        );

        let state = Arc::new(ServerState {
            lobby: Mutex::new(Lobby::new(self.matchmaking)),
            codec: JsonCodec,
        });

        Ok(DamasServer { transport, state })
    }
}

impl Default for DamasServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound relay server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct DamasServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl DamasServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> DamasServerBuilder {
        DamasServerBuilder::new()
    }
}

impl<C: Codec> DamasServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop.
    ///
    /// Spawns one handler task per accepted peer; the WebSocket upgrade
    /// runs inside that task, so a peer that never completes it only
    /// ties up its own task. Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), DamasError> {
        tracing::info!("damas server running");

        loop {
            match self.transport.accept().await {
                Ok(pending) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(pending, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
