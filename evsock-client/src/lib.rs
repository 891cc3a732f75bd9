//! Resilient, reconnecting, event-multiplexing WebSocket client
//!
//! This crate provides `EventSocket`: a client-side connection manager that
//! wraps one WebSocket connection, automatically reconnects with exponential
//! backoff on unexpected closure, parses inbound frames as structured event
//! records, and dispatches them to registered listeners by event type. A
//! reserved wildcard type (`"message"`) receives every successfully parsed
//! event.
//!
//! # Core Features
//!
//! - **Auto-Reconnection**: configurable strategies with exponential backoff
//! - **Type-Routed Dispatch**: listeners per event type, plus a wildcard tier
//! - **Lifecycle Events**: `open`, `error`, `close`, `reconnect_failed`
//!   delivered to in-process listeners
//! - **Explicit Ownership**: the socket is built unconnected; the owning
//!   component controls `connect`/`close`
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use evsock_client::SocketBuilder;
//! use evsock_core::EventRecord;
//!
//! #[tokio::main]
//! async fn main() -> evsock_core::Result<()> {
//!     let socket = SocketBuilder::new("ws://localhost:8080/ws/chat/5").build();
//!
//!     socket.on("new_message", |record| async move {
//!         println!("message: {:?}", record.field("content"));
//!     }).await;
//!
//!     socket.on("reconnect_failed", |_| async {
//!         eprintln!("gave up reconnecting");
//!     }).await;
//!
//!     socket.connect().await?;
//!
//!     socket.send(&EventRecord::new("typing").with_field("chat_id", 5)).await?;
//!
//!     socket.close().await;
//!     Ok(())
//! }
//! ```
//!
//! # Custom Reconnection
//!
//! ```rust,no_run
//! use evsock_client::{ExponentialBackoff, SocketBuilder};
//! use std::time::Duration;
//!
//! # async fn example() -> evsock_core::Result<()> {
//! let socket = SocketBuilder::new("ws://localhost:8080/ws/chat/5")
//!     .reconnect(Box::new(
//!         ExponentialBackoff::new(Duration::from_millis(100), Duration::from_secs(30))
//!             .with_max_attempts(3),
//!     ))
//!     .connect()
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod client;
mod connection_state;
mod endpoint;
mod listeners;
mod reconnect;

pub use builder::SocketBuilder;
pub use client::EventSocket;
pub use connection_state::{ConnectionManager, ConnectionState};
pub use endpoint::ws_endpoint;
pub use listeners::{ListenerFn, ListenerId, ListenerRegistry};
pub use reconnect::{ExponentialBackoff, FixedDelay, NoReconnect, ReconnectionStrategy};
