//! Integration tests for the WebSocket transport.
//!
//! These spin up a real listener on an ephemeral port and talk to it
//! with a `tokio-tungstenite` client.

#[cfg(feature = "websocket")]
mod websocket {
    use std::time::Duration;

    use damas_transport::{
        Connection, Handshake, Transport, TransportError, WebSocketTransport,
    };
    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message;

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    /// Binds on port 0 and accepts exactly one client.
    async fn accept_one() -> (damas_transport::WebSocketConnection, ClientWs) {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("local addr");

        let server_handle = tokio::spawn(async move {
            let pending = transport.accept().await.expect("should accept");
            pending.complete().await.expect("handshake should succeed")
        });

        let (client, _) =
            tokio_tungstenite::connect_async(format!("ws://{addr}"))
                .await
                .expect("client should connect");
        let server_conn = server_handle.await.expect("task should complete");
        (server_conn, client)
    }

    #[tokio::test]
    async fn test_websocket_text_round_trip() {
        let (server_conn, mut client) = accept_one().await;
        assert!(server_conn.id().into_inner() > 0);

        server_conn
            .send_text(r#"{"event":"waiting"}"#)
            .await
            .expect("send should succeed");

        let msg = client.next().await.unwrap().unwrap();
        assert!(msg.is_text(), "JSON events must arrive as text frames");
        assert_eq!(msg.into_text().unwrap().as_str(), r#"{"event":"waiting"}"#);

        client
            .send(Message::text(r#"{"event":"create_room"}"#.to_owned()))
            .await
            .unwrap();
        let received = server_conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, br#"{"event":"create_room"}"#);

        server_conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_websocket_send_does_not_wait_for_pending_recv() {
        let (server_conn, mut client) = accept_one().await;
        let server_conn = std::sync::Arc::new(server_conn);

        // Park a reader on the socket; nothing will arrive for it yet.
        let reader = {
            let conn = std::sync::Arc::clone(&server_conn);
            tokio::spawn(async move { conn.recv().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        tokio::time::timeout(
            Duration::from_secs(1),
            server_conn.send_text("pushed"),
        )
        .await
        .expect("send must not block behind recv")
        .expect("send should succeed");

        let msg = client.next().await.unwrap().unwrap();
        assert_eq!(msg.into_text().unwrap().as_str(), "pushed");

        client.send(Message::text("late".to_owned())).await.unwrap();
        let got = reader.await.unwrap().unwrap();
        assert_eq!(got.as_deref(), Some(&b"late"[..]));
    }

    #[tokio::test]
    async fn test_websocket_recv_returns_none_on_client_close() {
        let (server_conn, mut client) = accept_one().await;

        client.send(Message::Close(None)).await.unwrap();

        let result = server_conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }

    #[tokio::test]
    async fn test_websocket_connection_ids_are_distinct() {
        let (a, _ca) = accept_one().await;
        let (b, _cb) = accept_one().await;
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn test_silent_peer_handshake_times_out() {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("local addr");

        // Connects at the TCP level and never sends the upgrade request.
        let _silent = tokio::net::TcpStream::connect(addr)
            .await
            .expect("tcp connect");

        let pending = transport.accept().await.expect("should accept");
        let result = pending.complete_within(Duration::from_millis(100)).await;

        match result {
            Err(TransportError::AcceptFailed(e)) => {
                assert_eq!(e.kind(), std::io::ErrorKind::TimedOut);
            }
            Err(other) => panic!("expected timeout, got {other:?}"),
            Ok(_) => panic!("handshake with a silent peer must not succeed"),
        }
    }

    #[tokio::test]
    async fn test_accept_is_not_held_up_by_silent_peer() {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("local addr");

        let _silent = tokio::net::TcpStream::connect(addr)
            .await
            .expect("tcp connect");
        let first = transport.accept().await.expect("first accept");
        // The silent peer's handshake runs on its own task.
        let stalled = tokio::spawn(first.complete());

        let server_handle = tokio::spawn(async move {
            let pending = transport.accept().await.expect("second accept");
            pending.complete().await.expect("handshake should succeed")
        });
        let (_client, _) = tokio::time::timeout(
            Duration::from_secs(2),
            tokio_tungstenite::connect_async(format!("ws://{addr}")),
        )
        .await
        .expect("client must not wait on the silent peer")
        .expect("client should connect");

        let conn = tokio::time::timeout(Duration::from_secs(2), server_handle)
            .await
            .expect("second handshake should finish")
            .expect("task should complete");
        assert!(conn.id().into_inner() > 0);
        assert!(!stalled.is_finished());
        stalled.abort();
    }
}
