//! Common test utilities for evsock-client integration tests
//!
//! This module provides a mock WebSocket server for testing socket behavior
//! without a real backend: it records frames the client sends, pushes frames
//! to connected clients, and can drop connections to exercise reconnection.

#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Once;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

static TRACING: Once = Once::new();

/// Install a tracing subscriber for the test binary
///
/// Honors `RUST_LOG`; output goes through the test writer so it is
/// captured per test. Safe to call from every test.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Mock WebSocket server for socket testing
pub struct MockWsServer {
    addr: SocketAddr,
    shutdown_tx: mpsc::Sender<()>,
    message_rx: mpsc::Receiver<String>,
    conn_rx: mpsc::Receiver<()>,
    frame_tx: broadcast::Sender<String>,
    kick_tx: broadcast::Sender<()>,
}

impl MockWsServer {
    /// Start a new mock WebSocket server on an ephemeral port
    pub async fn new() -> Self {
        init_tracing();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let (msg_tx, message_rx) = mpsc::channel::<String>(100);
        let (conn_tx, conn_rx) = mpsc::channel::<()>(16);
        let (frame_tx, _) = broadcast::channel::<String>(100);
        let (kick_tx, _) = broadcast::channel::<()>(16);

        let frame_tx_server = frame_tx.clone();
        let kick_tx_server = kick_tx.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                    accept_result = listener.accept() => {
                        let Ok((stream, _)) = accept_result else { continue };
                        // Subscribe before the handshake so frames pushed
                        // right after wait_for_connection() are not lost
                        let mut frame_rx = frame_tx_server.subscribe();
                        let mut kick_rx = kick_tx_server.subscribe();
                        let msg_tx = msg_tx.clone();
                        let _ = conn_tx.send(()).await;

                        tokio::spawn(async move {
                            let Ok(ws_stream) = accept_async(stream).await else {
                                return;
                            };
                            let (mut write, mut read) = ws_stream.split();

                            loop {
                                tokio::select! {
                                    frame = frame_rx.recv() => match frame {
                                        Ok(text) => {
                                            if write.send(Message::Text(text)).await.is_err() {
                                                break;
                                            }
                                        }
                                        Err(_) => break,
                                    },
                                    _ = kick_rx.recv() => {
                                        let _ = write.send(Message::Close(None)).await;
                                        let _ = write.close().await;
                                        break;
                                    }
                                    msg = read.next() => match msg {
                                        Some(Ok(Message::Text(text))) => {
                                            let _ = msg_tx.send(text).await;
                                        }
                                        Some(Ok(Message::Close(_))) | None => break,
                                        Some(Ok(_)) => {}
                                        Some(Err(_)) => break,
                                    }
                                }
                            }
                        });
                    }
                }
            }
        });

        Self {
            addr,
            shutdown_tx,
            message_rx,
            conn_rx,
            frame_tx,
            kick_tx,
        }
    }

    /// Get the WebSocket URL for connecting to this server
    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Push a text frame to every connected client
    pub fn send_frame(&self, text: &str) {
        let _ = self.frame_tx.send(text.to_string());
    }

    /// Close every live connection from the server side
    pub fn kick(&self) {
        let _ = self.kick_tx.send(());
    }

    /// Wait for the next client connection to be accepted
    pub async fn wait_for_connection(&mut self) -> bool {
        tokio::time::timeout(tokio::time::Duration::from_secs(5), self.conn_rx.recv())
            .await
            .ok()
            .flatten()
            .is_some()
    }

    /// Wait for a text frame sent by a client
    pub async fn wait_for_message(&mut self) -> Option<String> {
        tokio::time::timeout(tokio::time::Duration::from_secs(5), self.message_rx.recv())
            .await
            .ok()
            .flatten()
    }

    /// Shut the server down: drop live connections and stop accepting
    pub async fn shutdown(self) {
        self.kick();
        let _ = self.shutdown_tx.send(()).await;
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    }
}

/// Helper to build an event frame with a `type` discriminator
pub fn event_frame(event_type: &str, fields: serde_json::Value) -> String {
    let mut obj = fields.as_object().cloned().unwrap_or_default();
    obj.insert(
        "type".to_string(),
        serde_json::Value::String(event_type.to_string()),
    );
    serde_json::Value::Object(obj).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_creation() {
        let server = MockWsServer::new().await;
        assert!(server.url().starts_with("ws://127.0.0.1:"));
        server.shutdown().await;
    }

    #[test]
    fn test_event_frame_format() {
        let frame = event_frame("new_message", serde_json::json!({"content": "hi"}));
        assert!(frame.contains("\"type\":\"new_message\""));
        assert!(frame.contains("\"content\":\"hi\""));
    }
}
