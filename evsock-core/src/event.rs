//! Event records and reserved event types
//!
//! Every frame received by the socket is parsed into an [`EventRecord`]: a
//! required `type` string discriminator plus an open-ended set of named
//! fields. The socket routes records to listeners by `type` and assigns no
//! meaning to the payload fields.
//!
//! # Reserved types
//!
//! A few type strings are reserved for events the socket itself emits about
//! its own lifecycle ([`OPEN`], [`ERROR`], [`CLOSE`], [`RECONNECT_FAILED`]),
//! and [`WILDCARD`] names the listener slot invoked for every successfully
//! parsed inbound frame regardless of its `type`.
//!
//! # Example
//!
//! ```rust
//! use evsock_core::EventRecord;
//! use serde_json::json;
//!
//! let record = EventRecord::new("new_message")
//!     .with_field("content", "hi")
//!     .with_field("chat_id", 5);
//!
//! assert_eq!(record.event_type, "new_message");
//! assert_eq!(record.field("content"), Some(&json!("hi")));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Emitted when a connection (or reconnection) opens. No payload.
pub const OPEN: &str = "open";

/// Emitted on a mid-connection transport fault. Carries an `error` field.
pub const ERROR: &str = "error";

/// Emitted when the transport closes. Carries `code`/`reason` when the
/// close frame supplied them.
pub const CLOSE: &str = "close";

/// Emitted once when the reconnect attempt budget is exhausted. Terminal;
/// a manual `connect()` is required to resume. No payload.
pub const RECONNECT_FAILED: &str = "reconnect_failed";

/// Listener slot invoked for every successfully parsed inbound frame.
pub const WILDCARD: &str = "message";

/// A structured event, parsed from or serialized to one frame
///
/// The `type` discriminator is the only field this component interprets;
/// everything else is carried verbatim in `fields`. Records handed to
/// listeners should be treated as immutable input: exact-type listeners run
/// before wildcard listeners and both tiers see the same record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event type discriminator used for listener routing
    #[serde(rename = "type")]
    pub event_type: String,

    /// Event-specific payload fields, opaque to the socket
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl EventRecord {
    /// Create an event record with no payload fields
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            fields: Map::new(),
        }
    }

    /// Add a payload field, builder style
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Look up a payload field by name
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}
