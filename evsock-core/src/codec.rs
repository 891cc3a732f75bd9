//! Codec for event frame serialization and deserialization
//!
//! Each frame on the wire is UTF-8 text containing a JSON object with at
//! minimum a string `type` field. This module converts between frames and
//! [`EventRecord`]s and maps failures to evsock error types.
//!
//! # Validation
//!
//! `decode` validates structure before handing a record to the caller:
//!
//! - the frame must be valid JSON,
//! - the top-level value must be an object (not an array or scalar),
//! - the object must carry a string `type` field.
//!
//! Anything else is a [`Error::Parse`]. The client logs and discards such
//! frames; they are never delivered to listeners.
//!
//! # Examples
//!
//! ```rust
//! use evsock_core::codec;
//!
//! let record = codec::decode(r#"{"type":"new_message","content":"hi"}"#).unwrap();
//! assert_eq!(record.event_type, "new_message");
//!
//! assert!(codec::decode("not json").is_err());
//! assert!(codec::decode(r#"{"content":"no type"}"#).is_err());
//! ```

use crate::error::{Error, Result};
use crate::event::EventRecord;
use serde::Serialize;
use serde_json::Value;

/// Encode any serializable payload to a frame
///
/// # Errors
///
/// Returns [`Error::Serialization`] if the payload cannot be represented
/// as JSON.
pub fn encode<T: Serialize>(payload: &T) -> Result<String> {
    serde_json::to_string(payload).map_err(|e| Error::Serialization(e.to_string()))
}

/// Decode a frame into an event record
///
/// # Errors
///
/// Returns [`Error::Parse`] if the frame is not valid JSON, is not an
/// object, or lacks a string `type` discriminator.
pub fn decode(frame: &str) -> Result<EventRecord> {
    let value: Value = serde_json::from_str(frame).map_err(|e| Error::Parse(e.to_string()))?;

    if !value.is_object() {
        return Err(Error::Parse("frame is not a JSON object".to_string()));
    }

    match value.get("type") {
        Some(Value::String(_)) => {}
        Some(_) => return Err(Error::Parse("\"type\" is not a string".to_string())),
        None => return Err(Error::Parse("missing \"type\" discriminator".to_string())),
    }

    serde_json::from_value(value).map_err(|e| Error::Parse(e.to_string()))
}
