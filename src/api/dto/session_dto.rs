//! Swipe-session DTOs: decisions and undo.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Decision, Listing, ListingId, SessionView};

/// Optional body of `POST /session/like` and `POST /session/dislike`.
///
/// Without a `listing_id` the decision targets the current card.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct DecisionRequest {
    /// Listing to decide on; defaults to the current card.
    pub listing_id: Option<ListingId>,
}

/// Result of a like/dislike.
#[derive(Debug, Serialize, ToSchema)]
pub struct DecisionResponse {
    /// `false` when the listing was no longer queued and nothing happened.
    pub applied: bool,
    /// Recorded decision.
    pub decision: Option<Decision>,
    /// Card presented after the decision.
    pub current: Option<Listing>,
    /// Listings left in the queue.
    pub queue_len: usize,
}

impl DecisionResponse {
    /// Builds the response from the decision and the session state that
    /// followed it.
    #[must_use]
    pub fn new(decision: Option<Decision>, view: SessionView) -> Self {
        Self {
            applied: decision.is_some(),
            decision,
            current: view.current,
            queue_len: view.queue.len(),
        }
    }
}

/// Result of `POST /session/undo`.
#[derive(Debug, Serialize, ToSchema)]
pub struct UndoResponse {
    /// Decision that was undone, `null` when there was none.
    pub restored: Option<Decision>,
    /// Card presented after the undo.
    pub current: Option<Listing>,
}
