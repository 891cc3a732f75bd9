//! Socket builder for configuring reconnection and connect timeout
//!
//! The `SocketBuilder` provides a fluent API for configuring the socket
//! before it is used. `build()` returns an unconnected socket so the owning
//! component controls the lifecycle explicitly (no connect-at-construction,
//! no module-level singletons); `connect()` is a convenience that builds
//! and dials in one step.
//!
//! # Examples
//!
//! ```rust,no_run
//! use evsock_client::{ExponentialBackoff, SocketBuilder};
//! use std::time::Duration;
//!
//! # async fn example() -> evsock_core::Result<()> {
//! // Default policy: exponential backoff from 1s, max 5 attempts
//! let socket = SocketBuilder::new("ws://localhost:8080/ws/chat").build();
//! socket.connect().await?;
//!
//! // Custom policy
//! let socket = SocketBuilder::new("ws://localhost:8080/ws/chat")
//!     .reconnect(Box::new(
//!         ExponentialBackoff::new(Duration::from_millis(100), Duration::from_secs(30))
//!             .with_max_attempts(3),
//!     ))
//!     .connect_timeout(Duration::from_secs(5))
//!     .connect()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use crate::connection_state::ConnectionManager;
use crate::reconnect::{ExponentialBackoff, NoReconnect, ReconnectionStrategy};
use crate::EventSocket;
use evsock_core::Result;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builder for configuring and creating an [`EventSocket`]
pub struct SocketBuilder {
    url: String,
    strategy: Option<Box<dyn ReconnectionStrategy>>,
    connect_timeout: Duration,
}

impl SocketBuilder {
    /// Create a new socket builder for an endpoint URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            strategy: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Use a custom reconnection strategy
    pub fn reconnect(mut self, strategy: Box<dyn ReconnectionStrategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Disable automatic reconnection
    pub fn no_reconnect(mut self) -> Self {
        self.strategy = Some(Box::new(NoReconnect));
        self
    }

    /// Bound each dial attempt (initial connect and reconnects)
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Build the socket without connecting
    pub fn build(self) -> EventSocket {
        let strategy = self
            .strategy
            .unwrap_or_else(|| Box::new(ExponentialBackoff::default()));
        let connection = Arc::new(ConnectionManager::new(self.url, strategy));
        EventSocket::new(connection, self.connect_timeout)
    }

    /// Build the socket and connect
    pub async fn connect(self) -> Result<EventSocket> {
        let socket = self.build();
        socket.connect().await?;
        Ok(socket)
    }
}
