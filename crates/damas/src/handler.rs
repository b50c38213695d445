//! Per-connection handler: lobby entry, event loop, teardown.
//!
//! Each accepted peer gets its own Tokio task running this handler.
//! The flow is:
//!   1. Finish the WebSocket upgrade (bounded by a timeout)
//!   2. Register an outbox with the lobby → waiting / paired / room list
//!   3. Loop: write queued server events, decode and apply client events
//!   4. On any exit, the drop guard disconnects the connection from the
//!      lobby so its room and waiting slot are torn down

use std::sync::Arc;

use damas_protocol::{ClientEvent, Codec, ConnectionId, ServerEvent};
use damas_transport::{
    Connection, Handshake, PendingWebSocket, WebSocketConnection,
};
use tokio::sync::mpsc;

use crate::DamasError;
use crate::server::ServerState;

/// Drop guard that removes a connection from the lobby when the handler
/// exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async lock.
struct DisconnectGuard<C: Codec> {
    conn_id: ConnectionId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for DisconnectGuard<C> {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let mut lobby = state.lobby.lock().await;
            let deliveries = lobby.disconnect(conn_id);
            lobby.dispatch(deliveries);
        });
    }
}

/// Handles a single peer from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    pending: PendingWebSocket,
    state: Arc<ServerState<C>>,
) -> Result<(), DamasError> {
    let peer = pending.peer_addr();
    let conn = pending.complete().await?;
    let conn_id = conn.id();
    tracing::debug!(%conn_id, %peer, "handling new connection");

    let (outbox, mut events) = mpsc::unbounded_channel();

    // Register and arm the guard back to back: if registration fails
    // there is nothing to tear down.
    {
        let mut lobby = state.lobby.lock().await;
        let deliveries = lobby.connect(conn_id, outbox)?;
        lobby.dispatch(deliveries);
    }
    let _guard = DisconnectGuard {
        conn_id,
        state: Arc::clone(&state),
    };

    loop {
        tokio::select! {
            outbound = events.recv() => {
                let Some(event) = outbound else {
                    tracing::debug!(%conn_id, "outbox closed");
                    break;
                };
                send_event(&conn, &state.codec, &event).await?;
            }
            inbound = conn.recv() => {
                let data = match inbound {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::info!(%conn_id, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%conn_id, error = %e, "recv error");
                        break;
                    }
                };

                let event: ClientEvent = match state.codec.decode(&data) {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::warn!(%conn_id, error = %e, "malformed frame, closing connection");
                        let reply = ServerEvent::ErrorMsg(format!("malformed message: {e}"));
                        send_event(&conn, &state.codec, &reply).await?;
                        if let Err(e) = conn.close().await {
                            tracing::debug!(%conn_id, error = %e, "close failed");
                        }
                        break;
                    }
                };

                let mut lobby = state.lobby.lock().await;
                let deliveries = lobby.handle(conn_id, event);
                lobby.dispatch(deliveries);
            }
        }
    }

    // _guard drops here → lobby disconnect fires.
    Ok(())
}

/// Encodes one server event and writes it as a text frame.
async fn send_event(
    conn: &WebSocketConnection,
    codec: &impl Codec,
    event: &ServerEvent,
) -> Result<(), DamasError> {
    let text = codec.encode_text(event)?;
    conn.send_text(&text).await?;
    Ok(())
}
