//! EVSOCK - Resilient Event Socket over WebSocket
//!
//! This is the main convenience crate that re-exports the evsock sub-crates.
//! Use this crate if you want a single dependency for the event socket and
//! its core types.
//!
//! # Architecture
//!
//! evsock is organized into modular crates:
//!
//! - **evsock-core**: event record type, codec, error handling
//! - **evsock-client**: the reconnecting, event-multiplexing socket client
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use evsock::SocketBuilder;
//!
//! #[tokio::main]
//! async fn main() -> evsock::core::Result<()> {
//!     let socket = SocketBuilder::new("ws://localhost:8080/ws/chat/5").build();
//!
//!     socket.on("new_message", |record| async move {
//!         println!("message: {:?}", record.field("content"));
//!     }).await;
//!
//!     socket.connect().await?;
//!     Ok(())
//! }
//! ```

// Re-export all public APIs from sub-crates
pub use evsock_client as client;
pub use evsock_core as core;

// Convenience re-exports of the most commonly used types
pub use evsock_client::{EventSocket, SocketBuilder};
pub use evsock_core::EventRecord;
