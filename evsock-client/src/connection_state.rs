//! Connection state management
//!
//! This module tracks the socket lifecycle and coordinates reconnection
//! attempts when the connection is lost.
//!
//! # Connection States
//!
//! - **Disconnected**: initial state, not connected
//! - **Connecting**: attempting to establish the connection
//! - **Connected**: connected and operational
//! - **Reconnecting**: connection lost, attempting to reconnect
//! - **Failed**: reconnection attempts exhausted, gave up
//! - **Closed**: closed by the caller; automatic reconnection suppressed
//!
//! # State Transitions
//!
//! ```text
//! Disconnected → Connecting → Connected
//!                     ↓            ↓
//!                  Failed  ←  Reconnecting
//!
//! Closed is reachable from any state via close().
//! ```
//!
//! # Reconnection Logic
//!
//! When an open connection is lost and the loss was not caller-initiated:
//! 1. Enter Reconnecting
//! 2. Consult the ReconnectionStrategy for a delay
//! 3. Wait, then attempt to connect
//! 4. On success: back to Connected (strategy and attempt counter reset)
//! 5. On failure: repeat from step 2, or enter Failed once the strategy
//!    gives up

use crate::reconnect::ReconnectionStrategy;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Connection state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected
    Disconnected,
    /// Attempting to connect
    Connecting,
    /// Successfully connected
    Connected,
    /// Reconnecting after an unexpected disconnection
    Reconnecting { attempt: u32 },
    /// Failed to reconnect (gave up)
    Failed,
    /// Closed by the caller; no automatic reconnection
    Closed,
}

/// Manages connection state and reconnection bookkeeping
pub struct ConnectionManager {
    state: Arc<RwLock<ConnectionState>>,
    strategy: Arc<RwLock<Box<dyn ReconnectionStrategy>>>,
    url: String,
}

impl ConnectionManager {
    /// Create a new connection manager
    pub fn new(url: String, strategy: Box<dyn ReconnectionStrategy>) -> Self {
        Self {
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            strategy: Arc::new(RwLock::new(strategy)),
            url,
        }
    }

    /// Get the current connection state
    pub async fn state(&self) -> ConnectionState {
        self.state.read().await.clone()
    }

    /// Set the connection state
    pub async fn set_state(&self, new_state: ConnectionState) {
        *self.state.write().await = new_state;
    }

    /// Get the endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Claim the connecting state
    ///
    /// Returns `false` when a connection attempt or live session already
    /// owns the socket. The check and the transition happen under a single
    /// write lock so concurrent callers cannot both claim it.
    pub async fn begin_connecting(&self) -> bool {
        let mut state = self.state.write().await;
        match *state {
            ConnectionState::Connecting
            | ConnectionState::Connected
            | ConnectionState::Reconnecting { .. } => false,
            ConnectionState::Disconnected | ConnectionState::Failed | ConnectionState::Closed => {
                *state = ConnectionState::Connecting;
                true
            }
        }
    }

    /// Transition to connected state
    ///
    /// Resets the reconnection strategy so the attempt counter starts
    /// fresh on the next disconnect. Returns `false` without transitioning
    /// when the socket was closed while the handshake was in flight.
    pub async fn connected(&self) -> bool {
        {
            let mut state = self.state.write().await;
            if *state == ConnectionState::Closed {
                return false;
            }
            *state = ConnectionState::Connected;
        }
        self.strategy.write().await.reset();
        true
    }

    /// Transition to disconnected state
    ///
    /// A no-op once the caller has closed the socket.
    pub async fn disconnected(&self) {
        let mut state = self.state.write().await;
        if *state != ConnectionState::Closed {
            *state = ConnectionState::Disconnected;
        }
    }

    /// Transition to the caller-closed terminal state
    pub async fn closed(&self) {
        self.set_state(ConnectionState::Closed).await;
    }

    /// Start reconnection attempts
    ///
    /// A no-op once the caller has closed the socket.
    pub async fn start_reconnecting(&self) {
        let mut state = self.state.write().await;
        if *state != ConnectionState::Closed {
            *state = ConnectionState::Reconnecting { attempt: 0 };
        }
    }

    /// Get the next reconnection delay and advance the attempt counter
    ///
    /// Returns `None` once the strategy gives up, transitioning to Failed,
    /// or immediately when the socket has been closed. The state lock is
    /// held across the read and the update so a close() cannot land in
    /// between and be overwritten.
    pub async fn next_reconnect_delay(&self) -> Option<std::time::Duration> {
        let mut state = self.state.write().await;

        let attempt = match *state {
            ConnectionState::Closed => return None,
            ConnectionState::Reconnecting { attempt } => attempt,
            _ => 0,
        };

        let delay = self.strategy.write().await.next_delay(attempt);

        if delay.is_some() {
            *state = ConnectionState::Reconnecting {
                attempt: attempt + 1,
            };
        } else {
            *state = ConnectionState::Failed;
        }

        delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconnect::ExponentialBackoff;
    use std::time::Duration;

    #[tokio::test]
    async fn test_connection_state_transitions() {
        let strategy =
            ExponentialBackoff::new(Duration::from_millis(100), Duration::from_secs(10));
        let manager = ConnectionManager::new("ws://localhost:8080".to_string(), Box::new(strategy));

        assert_eq!(manager.state().await, ConnectionState::Disconnected);

        assert!(manager.begin_connecting().await);
        assert_eq!(manager.state().await, ConnectionState::Connecting);

        assert!(manager.connected().await);
        assert_eq!(manager.state().await, ConnectionState::Connected);

        manager.closed().await;
        assert_eq!(manager.state().await, ConnectionState::Closed);
    }

    #[tokio::test]
    async fn test_begin_connecting_is_exclusive() {
        let strategy =
            ExponentialBackoff::new(Duration::from_millis(100), Duration::from_secs(10));
        let manager = ConnectionManager::new("ws://localhost:8080".to_string(), Box::new(strategy));

        assert!(manager.begin_connecting().await);
        // A second claim while the first is still in flight loses
        assert!(!manager.begin_connecting().await);

        assert!(manager.connected().await);
        assert!(!manager.begin_connecting().await);

        manager.start_reconnecting().await;
        assert!(!manager.begin_connecting().await);

        // Terminal states release the claim
        manager.set_state(ConnectionState::Failed).await;
        assert!(manager.begin_connecting().await);
    }

    #[tokio::test]
    async fn test_closed_state_is_sticky() {
        let strategy =
            ExponentialBackoff::new(Duration::from_millis(100), Duration::from_secs(10));
        let manager = ConnectionManager::new("ws://localhost:8080".to_string(), Box::new(strategy));

        manager.closed().await;

        manager.start_reconnecting().await;
        assert_eq!(manager.state().await, ConnectionState::Closed);

        assert!(manager.next_reconnect_delay().await.is_none());
        assert_eq!(manager.state().await, ConnectionState::Closed);

        assert!(!manager.connected().await);
        assert_eq!(manager.state().await, ConnectionState::Closed);

        // Only a fresh caller-initiated connect re-arms the socket
        assert!(manager.begin_connecting().await);
        assert_eq!(manager.state().await, ConnectionState::Connecting);
    }

    #[tokio::test]
    async fn test_reconnection_attempts() {
        let strategy =
            ExponentialBackoff::new(Duration::from_millis(100), Duration::from_secs(10))
                .with_max_attempts(3);

        let manager = ConnectionManager::new("ws://localhost:8080".to_string(), Box::new(strategy));

        manager.start_reconnecting().await;
        assert_eq!(
            manager.state().await,
            ConnectionState::Reconnecting { attempt: 0 }
        );

        let delay1 = manager.next_reconnect_delay().await;
        assert_eq!(delay1, Some(Duration::from_millis(100)));
        assert_eq!(
            manager.state().await,
            ConnectionState::Reconnecting { attempt: 1 }
        );

        let delay2 = manager.next_reconnect_delay().await;
        assert_eq!(delay2, Some(Duration::from_millis(200)));
        assert_eq!(
            manager.state().await,
            ConnectionState::Reconnecting { attempt: 2 }
        );

        let delay3 = manager.next_reconnect_delay().await;
        assert_eq!(delay3, Some(Duration::from_millis(400)));
        assert_eq!(
            manager.state().await,
            ConnectionState::Reconnecting { attempt: 3 }
        );

        // Budget exhausted
        let delay4 = manager.next_reconnect_delay().await;
        assert!(delay4.is_none());
        assert_eq!(manager.state().await, ConnectionState::Failed);
    }

    #[tokio::test]
    async fn test_strategy_reset_on_connect() {
        let strategy =
            ExponentialBackoff::new(Duration::from_millis(100), Duration::from_secs(10));

        let manager = ConnectionManager::new("ws://localhost:8080".to_string(), Box::new(strategy));

        manager.start_reconnecting().await;
        manager.next_reconnect_delay().await;
        manager.next_reconnect_delay().await;

        // After a successful connection, the attempt counter starts over
        manager.connected().await;

        manager.start_reconnecting().await;
        assert_eq!(
            manager.state().await,
            ConnectionState::Reconnecting { attempt: 0 }
        );
        assert_eq!(
            manager.next_reconnect_delay().await,
            Some(Duration::from_millis(100))
        );
    }
}
