//! Resilient event socket over WebSocket
//!
//! This module provides the main `EventSocket` type, which maintains one
//! logical connection to a remote endpoint across transient network
//! failures and routes parsed events to registered listeners by type.
//!
//! # Socket Lifecycle
//!
//! 1. **Build**: configure endpoint, reconnect policy, connect timeout
//! 2. **Connect**: establish the WebSocket connection explicitly
//! 3. **Use**: send events, register listeners
//! 4. **Reconnect**: handled automatically on unexpected closure
//! 5. **Close**: terminate permanently; suppresses further reconnects
//!
//! # Cloning
//!
//! `EventSocket` is cheaply cloneable using `Arc` internally. All clones
//! share the same connection, state, and listener registry, so the socket
//! can be handed to multiple tasks.
//!
//! # Single writer
//!
//! All connection-state mutation happens either in the caller-invoked
//! `connect`/`close` paths or inside the one spawned receive task; the
//! shared pieces are behind async locks so no caller ever observes a
//! half-applied transition.

use crate::connection_state::{ConnectionManager, ConnectionState};
use crate::listeners::{ListenerId, ListenerRegistry};
use evsock_core::{codec, event, Error, EventRecord, Result};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type WsTransport = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;
type WsSink = futures::stream::SplitSink<WsTransport, Message>;
type WsStream = futures::stream::SplitStream<WsTransport>;

/// Resilient, reconnecting, event-multiplexing WebSocket client
///
/// Construct via [`SocketBuilder`](crate::SocketBuilder); the socket does
/// not connect until [`connect`](EventSocket::connect) is called.
#[derive(Clone)]
pub struct EventSocket {
    /// Write half of the transport; `None` while disconnected
    sink: Arc<Mutex<Option<WsSink>>>,
    /// Listener registry shared with the receive task
    listeners: ListenerRegistry,
    /// Connection state and reconnection bookkeeping
    connection: Arc<ConnectionManager>,
    /// Caller-closed flag; flipping it to true cancels a pending backoff wait
    closed: Arc<watch::Sender<bool>>,
    /// Bound on each dial attempt (initial connect and reconnects)
    connect_timeout: Duration,
}

impl EventSocket {
    pub(crate) fn new(connection: Arc<ConnectionManager>, connect_timeout: Duration) -> Self {
        let (closed, _) = watch::channel(false);
        Self {
            sink: Arc::new(Mutex::new(None)),
            listeners: ListenerRegistry::new(),
            connection,
            closed: Arc::new(closed),
            connect_timeout,
        }
    }

    /// Establish the connection
    ///
    /// Resolves once the transport signals open; an `open` event is emitted
    /// and the reconnect attempt counter resets to 0. Fails with
    /// [`Error::AlreadyConnected`] if a connection is already live or being
    /// established, so two live connections can never exist. After
    /// [`close`](EventSocket::close) or exhausted reconnect attempts, calling
    /// this again resumes normal operation.
    ///
    /// # Errors
    ///
    /// Rejects with [`Error::WebSocket`] if the initial handshake fails and
    /// [`Error::ConnectTimeout`] if it does not complete within the
    /// configured bound.
    #[tracing::instrument(skip(self), fields(endpoint = %self.connection.url()))]
    pub async fn connect(&self) -> Result<()> {
        if self.connection.url().is_empty() {
            return Err(Error::InvalidEndpoint("empty endpoint".to_string()));
        }
        // Atomic claim of the Connecting state; racing connect() calls
        // on clones cannot both pass
        if !self.connection.begin_connecting().await {
            return Err(Error::AlreadyConnected);
        }

        // Re-arm after a previous close() or exhausted retry budget
        self.closed.send_replace(false);

        tracing::info!("Connecting");
        let mut closed = self.closed.subscribe();
        let dial = tokio::select! {
            _ = closed.wait_for(|closed| *closed) => {
                // close() pre-empted the dial
                return Err(Error::ConnectionClosed);
            }
            result = Self::dial(self.connection.url(), self.connect_timeout) => result,
        };
        let transport = match dial {
            Ok(transport) => transport,
            Err(e) => {
                if !*self.closed.borrow() {
                    self.connection.disconnected().await;
                }
                tracing::error!(error = %e, "Connection failed");
                return Err(e);
            }
        };

        let (sink, stream) = transport.split();
        *self.sink.lock().await = Some(sink);
        if !self.connection.connected().await {
            // close() landed between the dial and the state transition
            self.sink.lock().await.take();
            return Err(Error::ConnectionClosed);
        }
        tracing::info!("Connected");
        self.listeners
            .dispatch_local(EventRecord::new(event::OPEN))
            .await;

        // One task owns the read half and drives reconnection
        tokio::spawn(self.clone().receive_loop(stream));

        Ok(())
    }

    /// Send an event to the server
    ///
    /// The payload may be an [`EventRecord`] or any serializable value.
    /// When the socket is not connected the payload is dropped with a
    /// warning; there is no queueing and no delivery guarantee while
    /// disconnected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if the payload cannot be encoded
    /// and [`Error::WebSocket`] if the transport write fails.
    pub async fn send<T: Serialize>(&self, payload: &T) -> Result<()> {
        let text = codec::encode(payload)?;

        let mut sink = self.sink.lock().await;
        match sink.as_mut() {
            Some(sink) => sink
                .send(Message::Text(text))
                .await
                .map_err(|e| Error::WebSocket(e.to_string())),
            None => {
                tracing::warn!("Socket is not connected, dropping outbound event");
                Ok(())
            }
        }
    }

    /// Register a listener for an event type
    ///
    /// Use [`event::WILDCARD`] to receive every successfully parsed inbound
    /// frame. Returns a handle for [`off`](EventSocket::off).
    pub async fn on<F, Fut>(&self, event_type: impl Into<String>, listener: F) -> ListenerId
    where
        F: Fn(EventRecord) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.listeners.add(event_type, listener).await
    }

    /// Unregister a listener
    ///
    /// A no-op if the listener is not registered. After this returns the
    /// listener is not invoked for any subsequently handled frame.
    pub async fn off(&self, event_type: &str, id: ListenerId) {
        self.listeners.remove(event_type, id).await;
    }

    /// Terminate the connection permanently
    ///
    /// Marks the socket caller-closed (suppressing automatic reconnects and
    /// cancelling any pending backoff wait) and closes the transport if
    /// open. Idempotent. No events fire after this returns.
    pub async fn close(&self) {
        self.closed.send_replace(true);
        self.connection.closed().await;

        if let Some(mut sink) = self.sink.lock().await.take() {
            tracing::info!("Closing connection");
            let _ = sink.send(Message::Close(None)).await;
            let _ = sink.close().await;
        }
    }

    /// Check if the socket is currently connected
    pub async fn is_connected(&self) -> bool {
        matches!(self.connection.state().await, ConnectionState::Connected)
    }

    /// Get the current connection state
    pub async fn state(&self) -> ConnectionState {
        self.connection.state().await
    }

    /// Get the listener registry
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Dial the endpoint, bounded by the connect timeout
    async fn dial(url: &str, limit: Duration) -> Result<WsTransport> {
        match tokio::time::timeout(limit, connect_async(url)).await {
            Ok(Ok((transport, _))) => Ok(transport),
            Ok(Err(e)) => Err(Error::WebSocket(e.to_string())),
            Err(_) => Err(Error::ConnectTimeout),
        }
    }

    /// Receive loop: reads frames until closure, then drives reconnection
    async fn receive_loop(self, mut stream: WsStream) {
        let mut closed = self.closed.subscribe();

        'session: loop {
            // Read phase: process frames until the transport closes.
            // The frame is matched outside select! so no arm body awaits.
            loop {
                let frame = tokio::select! {
                    _ = closed.wait_for(|closed| *closed) => return,
                    frame = stream.next() => frame,
                };
                match frame {
                    Some(Ok(Message::Text(text))) => self.handle_frame(&text).await,
                    Some(Ok(Message::Close(close_frame))) => {
                        let mut record = EventRecord::new(event::CLOSE);
                        if let Some(frame) = close_frame {
                            tracing::info!(
                                code = u16::from(frame.code),
                                reason = %frame.reason,
                                "Connection closed by server"
                            );
                            record = record
                                .with_field("code", u16::from(frame.code))
                                .with_field("reason", frame.reason.to_string());
                        } else {
                            tracing::info!("Connection closed by server");
                        }
                        self.listeners.dispatch_local(record).await;
                        break;
                    }
                    Some(Err(e)) => {
                        // Non-fatal by itself; the close signal is the
                        // authoritative termination trigger
                        tracing::error!(error = %e, "WebSocket error");
                        self.listeners
                            .dispatch_local(
                                EventRecord::new(event::ERROR)
                                    .with_field("error", e.to_string()),
                            )
                            .await;
                    }
                    Some(Ok(_)) => {} // Ignore ping/pong/binary
                    None => {
                        tracing::info!("Connection lost");
                        self.listeners
                            .dispatch_local(EventRecord::new(event::CLOSE))
                            .await;
                        break;
                    }
                }
            }

            if *closed.borrow() {
                return;
            }

            // Sends now warn instead of writing into a dead transport
            self.sink.lock().await.take();
            self.connection.start_reconnecting().await;

            // Backoff phase
            loop {
                if *closed.borrow() {
                    return;
                }
                let Some(delay) = self.connection.next_reconnect_delay().await else {
                    if *closed.borrow() {
                        return;
                    }
                    tracing::error!("Reconnection abandoned, attempt budget exhausted");
                    self.listeners
                        .dispatch_local(EventRecord::new(event::RECONNECT_FAILED))
                        .await;
                    return;
                };
                let attempt = match self.connection.state().await {
                    ConnectionState::Reconnecting { attempt } => attempt,
                    _ => 0,
                };
                tracing::info!(
                    delay_ms = delay.as_millis() as u64,
                    attempt,
                    "Reconnecting"
                );

                tokio::select! {
                    _ = closed.wait_for(|closed| *closed) => return,
                    _ = tokio::time::sleep(delay) => {}
                }

                // The dial itself is cancellable; a close() mid-handshake
                // must not be outrun by a slow or stalled endpoint
                let dial = tokio::select! {
                    _ = closed.wait_for(|closed| *closed) => return,
                    result = Self::dial(self.connection.url(), self.connect_timeout) => result,
                };
                match dial {
                    Ok(transport) => {
                        let (sink, new_stream) = transport.split();
                        *self.sink.lock().await = Some(sink);
                        if !self.connection.connected().await {
                            // close() won the race; drop the fresh transport
                            self.sink.lock().await.take();
                            return;
                        }
                        tracing::info!("Reconnected");
                        self.listeners
                            .dispatch_local(EventRecord::new(event::OPEN))
                            .await;
                        stream = new_stream;
                        continue 'session;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Reconnect attempt failed");
                    }
                }
            }
        }
    }

    /// Handle one inbound text frame
    ///
    /// Malformed frames are logged and discarded; listeners never see them.
    async fn handle_frame(&self, text: &str) {
        match codec::decode(text) {
            Ok(record) => {
                tracing::debug!(event_type = %record.event_type, "Event received");
                self.listeners.dispatch_frame(record).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Discarding malformed frame");
            }
        }
    }
}
