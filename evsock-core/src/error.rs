//! Error types for evsock
//!
//! A single error enum covers the conditions a caller of the event socket can
//! observe. The taxonomy follows how each condition is surfaced:
//!
//! - **Parse**: a malformed inbound frame. The client recovers locally (logs
//!   and discards); listeners never see this error.
//! - **WebSocket / ConnectTimeout**: transport faults. Mid-connection faults
//!   reach listeners as an `error` event; initial-connect faults are returned
//!   from `connect()`.
//! - **AlreadyConnected / InvalidEndpoint**: caller mistakes, returned from
//!   `connect()` before any I/O happens.

use thiserror::Error;

/// Result type for evsock operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type shared by the evsock crates
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// An inbound frame could not be parsed as an event record
    ///
    /// Frames must be JSON objects carrying a string `type` field. The client
    /// discards such frames without delivering them to listeners.
    #[error("Malformed frame: {0}")]
    Parse(String),

    /// An outbound payload could not be serialized to JSON
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// WebSocket transport layer error
    ///
    /// Covers handshake failures, protocol violations, and frame write
    /// errors below the event layer.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// The connection attempt did not complete within the configured bound
    #[error("Connect attempt timed out")]
    ConnectTimeout,

    /// `connect()` was called while a connection is already live
    ///
    /// The socket never holds two live connections; rely on automatic
    /// reconnection instead of calling `connect()` repeatedly.
    #[error("Already connected")]
    AlreadyConnected,

    /// The endpoint URL is unusable (for example, empty)
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The socket was closed while a connection attempt was in flight
    ///
    /// Returned from `connect()` when `close()` pre-empts the handshake; the
    /// dialed transport, if any, is dropped.
    #[error("Connection closed")]
    ConnectionClosed,
}
