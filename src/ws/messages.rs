//! WebSocket message types: envelope and commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ListingId;

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Server → client message stamped with the current time.
    #[must_use]
    pub fn new(id: impl Into<String>, msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Broadcast event with a fresh id.
    #[must_use]
    pub fn event(payload: serde_json::Value) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), WsMessageType::Event, payload)
    }

    /// Error reply to the request `id`.
    #[must_use]
    pub fn error(id: impl Into<String>, code: u32, message: impl Into<String>) -> Self {
        Self::new(
            id,
            WsMessageType::Error,
            serde_json::json!({
                "code": code,
                "message": message.into(),
            }),
        )
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client broadcast event.
    Event,
    /// Server → Client error.
    Error,
}

/// Commands that a client can send over WebSocket, carried in the
/// payload of a `command` envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Subscribe to event topics.
    Subscribe {
        /// Topic names (`queue`, `liked`, `navigation`, `errors`). Use
        /// `["*"]` for all topics.
        topics: Vec<String>,
    },
    /// Unsubscribe from event topics.
    Unsubscribe {
        /// Topic names to drop.
        topics: Vec<String>,
    },
    /// Like the current card or a queued listing.
    Like {
        /// Target listing; defaults to the current card.
        #[serde(default)]
        listing_id: Option<ListingId>,
    },
    /// Dislike the current card or a queued listing.
    Dislike {
        /// Target listing; defaults to the current card.
        #[serde(default)]
        listing_id: Option<ListingId>,
    },
    /// Restore the last decided card.
    Undo,
}
