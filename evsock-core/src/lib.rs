//! Core event types and codec for evsock
//!
//! This crate provides the foundational pieces for the evsock event socket:
//!
//! - **Event records**: the structured result of parsing an inbound frame,
//!   keyed by a `type` discriminator with an open-ended payload
//! - **Codec**: encoding and decoding of frames to/from event records
//! - **Error handling**: error types shared by all evsock crates
//!
//! # Overview
//!
//! The wire format is deliberately minimal: each frame is a UTF-8 text message
//! containing a JSON object with at minimum a string `type` field. All other
//! fields are event-specific and opaque to this crate. The `evsock-client`
//! crate builds the connection management and listener dispatch on top of this
//! foundation.
//!
//! # Example
//!
//! ```rust
//! use evsock_core::{codec, EventRecord};
//!
//! let record = EventRecord::new("typing").with_field("chat_id", 5);
//! let json = codec::encode(&record).unwrap();
//!
//! let decoded = codec::decode(&json).unwrap();
//! assert_eq!(decoded.event_type, "typing");
//! ```

pub mod codec;
pub mod error;
pub mod event;

// Re-export the most commonly used types for convenience
pub use error::{Error, Result};
pub use event::EventRecord;
