//! Domain events reflecting session state changes.
//!
//! Every state change emits a [`SessionEvent`] through the
//! [`super::EventBus`]. Events are forwarded to WebSocket clients that
//! subscribed to the event's [`Topic`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Direction, ListingId, Screen};

/// Event category used for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Queue changes: snapshots, decisions, undo.
    Queue,
    /// Liked-set changes and filter updates.
    Liked,
    /// Screen changes.
    Navigation,
    /// Failed mutations and subscriptions.
    Errors,
}

impl Topic {
    /// Returns the topic name as a static string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queue => "queue",
            Self::Liked => "liked",
            Self::Navigation => "navigation",
            Self::Errors => "errors",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queue" => Ok(Self::Queue),
            "liked" => Ok(Self::Liked),
            "navigation" => Ok(Self::Navigation),
            "errors" => Ok(Self::Errors),
            other => Err(format!("unknown topic: {other}")),
        }
    }
}

/// Which feed subscription an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    /// The full listing collection.
    Listings,
    /// The per-user liked collection.
    Liked,
}

/// Domain event emitted after every session state change.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The queue was replaced from a feed snapshot.
    QueueUpdated {
        /// Number of undecided listings.
        queue_len: usize,
        /// Listing now presented, if any.
        current: Option<ListingId>,
        /// Application timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The liked set was replaced from a liked snapshot.
    LikedUpdated {
        /// Size of the liked set.
        liked_count: usize,
        /// Application timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A like or dislike was applied locally.
    DecisionRecorded {
        /// Decided listing.
        listing_id: ListingId,
        /// Like or dislike.
        direction: Direction,
        /// Listing now presented, if any.
        current: Option<ListingId>,
        /// Decision timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The last decision was undone locally.
    DecisionUndone {
        /// Restored listing, now presented.
        listing_id: ListingId,
        /// Direction of the undone decision.
        direction: Direction,
        /// Undo timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Category filter or search query changed.
    FiltersChanged {
        /// Selected category.
        category: String,
        /// Current search query.
        query: String,
        /// Number of liked listings matching both.
        matching: usize,
        /// Change timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The presented screen changed.
    NavigationChanged {
        /// New screen.
        screen: Screen,
        /// Change timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A remote like/dislike failed. The local queue is not rolled back.
    MutationFailed {
        /// Listing the mutation was for.
        listing_id: ListingId,
        /// Mutation that failed.
        direction: Direction,
        /// Failure description.
        message: String,
        /// Failure timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A feed subscription ended with an error; its last state is kept.
    SubscriptionFailed {
        /// Subscription that failed.
        feed: FeedKind,
        /// Failure description.
        message: String,
        /// Failure timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl SessionEvent {
    /// Returns the topic this event is published under.
    #[must_use]
    pub const fn topic(&self) -> Topic {
        match self {
            Self::QueueUpdated { .. }
            | Self::DecisionRecorded { .. }
            | Self::DecisionUndone { .. } => Topic::Queue,
            Self::LikedUpdated { .. } | Self::FiltersChanged { .. } => Topic::Liked,
            Self::NavigationChanged { .. } => Topic::Navigation,
            Self::MutationFailed { .. } | Self::SubscriptionFailed { .. } => Topic::Errors,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::QueueUpdated { .. } => "queue_updated",
            Self::LikedUpdated { .. } => "liked_updated",
            Self::DecisionRecorded { .. } => "decision_recorded",
            Self::DecisionUndone { .. } => "decision_undone",
            Self::FiltersChanged { .. } => "filters_changed",
            Self::NavigationChanged { .. } => "navigation_changed",
            Self::MutationFailed { .. } => "mutation_failed",
            Self::SubscriptionFailed { .. } => "subscription_failed",
        }
    }
}
