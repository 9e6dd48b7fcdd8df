//! Error types shared between client and server.
//!
//! The `TradeError` enum unifies codec, framing, transport and output failures
//! so every crate in the workspace can propagate a single error type.
use std::io;
use std::time::Duration;

use thiserror::Error;

/// Unified error type shared by client and server.
#[derive(Error, Debug)]
pub enum TradeError {
    /// An input value does not fit the declared wire width of its field.
    #[error("Field overflow: {field} = {value} does not fit its wire width")]
    FieldOverflow {
        /// Field name as it appears in the wire layout.
        field: &'static str,
        /// Offending value rendered as text.
        value: String,
    },

    /// Fewer bytes were supplied than a full message needs.
    #[error("Truncated message: needed {needed} bytes, got {available}")]
    TruncatedMessage {
        /// Bytes required for a complete message.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// The response had no header terminator or could not be interpreted.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// No complete response arrived within the allowed window.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Socket-level failure while connecting to the peer.
    #[error("Connection error: {0}")]
    Connection(io::Error),

    /// I/O error originating from the standard library or sockets.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Channel send failed (e.g., every worker has exited); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),
}

impl TradeError {
    /// Shorthand for a [`TradeError::FieldOverflow`] on `field`.
    pub fn overflow(field: &'static str, value: impl ToString) -> Self {
        TradeError::FieldOverflow {
            field,
            value: value.to_string(),
        }
    }
}
