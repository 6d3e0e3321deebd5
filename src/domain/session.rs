//! Swipe session state: the undecided queue, single-level undo, and the
//! liked-set derivations.
//!
//! [`SwipeSession`] is a plain value with no I/O. The service layer owns it,
//! feeds it snapshots from the feed adapter, and issues the remote
//! mutations that follow a decision.
//!
//! The queue's *last* element is the current card; every decision targets
//! it and undo pushes the restored listing back onto the end.

use std::collections::HashSet;

use serde::Serialize;
use utoipa::ToSchema;

use super::filter::{self, ALL_CATEGORIES};
use super::{Decision, Direction, Listing, ListingId};

/// In-memory state of one user's swipe session.
#[derive(Debug, Clone)]
pub struct SwipeSession {
    queue: Vec<Listing>,
    liked: Vec<Listing>,
    last_decision: Option<Decision>,
    decided: HashSet<ListingId>,
    category_filter: String,
    search_query: String,
}

impl SwipeSession {
    /// Creates an empty session with the default filters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            liked: Vec::new(),
            last_decision: None,
            decided: HashSet::new(),
            category_filter: ALL_CATEGORIES.to_string(),
            search_query: String::new(),
        }
    }

    /// Replaces the queue with the undecided listings of a feed snapshot.
    ///
    /// Listings flagged `is_swiped` and listings decided earlier in this
    /// session are dropped; duplicate ids keep their first occurrence.
    /// Feed order is preserved. The liked set is not touched.
    pub fn on_feed_snapshot(&mut self, listings: Vec<Listing>) {
        let mut seen = HashSet::with_capacity(listings.len());
        self.queue = listings
            .into_iter()
            .filter(|listing| !listing.is_swiped && !self.decided.contains(&listing.id))
            .filter(|listing| seen.insert(listing.id.clone()))
            .collect();
    }

    /// Replaces the liked set wholesale. This is the only way it changes.
    pub fn on_liked_snapshot(&mut self, liked: Vec<Listing>) {
        self.liked = liked;
    }

    /// Records a like on `listing` and removes it from the queue.
    ///
    /// Returns `true` if the listing was in the queue.
    pub fn like(&mut self, listing: Listing) -> bool {
        self.decide(listing, Direction::Like)
    }

    /// Records a dislike on `listing` and removes it from the queue.
    ///
    /// Returns `true` if the listing was in the queue.
    pub fn dislike(&mut self, listing: Listing) -> bool {
        self.decide(listing, Direction::Dislike)
    }

    /// Removes `listing` from the queue and records `direction` on it as
    /// the last decision.
    ///
    /// A listing that is not queued is left alone: the queue, the undo
    /// target and the decided set stay as they were, and `false` is
    /// returned.
    pub fn decide(&mut self, listing: Listing, direction: Direction) -> bool {
        let before = self.queue.len();
        self.queue.retain(|queued| queued.id != listing.id);
        if self.queue.len() == before {
            return false;
        }
        self.decided.insert(listing.id.clone());
        self.last_decision = Some(Decision::new(listing, direction));
        true
    }

    /// Restores the listing of the last decision as the current card.
    ///
    /// Returns the undone decision, or `None` when there is nothing to undo.
    /// The remote mutation issued for the decision is left as is.
    pub fn undo(&mut self) -> Option<Decision> {
        let decision = self.last_decision.take()?;
        self.decided.remove(&decision.listing.id);
        if !self.queue.iter().any(|queued| queued.id == decision.listing.id) {
            self.queue.push(decision.listing.clone());
        }
        Some(decision)
    }

    /// Sets the category filter; `"Alles"`/`"all"` disables it.
    pub fn set_category_filter(&mut self, category: impl Into<String>) {
        self.category_filter = category.into();
    }

    /// Sets the free-text search query; blank disables it.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// The listing currently presented (last in the queue).
    #[must_use]
    pub fn current(&self) -> Option<&Listing> {
        self.queue.last()
    }

    /// Undecided listings in feed order.
    #[must_use]
    pub fn queue(&self) -> &[Listing] {
        &self.queue
    }

    /// Looks up an undecided listing by id.
    #[must_use]
    pub fn queued(&self, id: &ListingId) -> Option<&Listing> {
        self.queue.iter().find(|listing| &listing.id == id)
    }

    /// The liked set as last delivered by the feed.
    #[must_use]
    pub fn liked(&self) -> &[Listing] {
        &self.liked
    }

    /// Looks up a liked listing by id.
    #[must_use]
    pub fn liked_listing(&self, id: &ListingId) -> Option<&Listing> {
        self.liked.iter().find(|listing| &listing.id == id)
    }

    /// The decision an undo would revert.
    #[must_use]
    pub fn last_decision(&self) -> Option<&Decision> {
        self.last_decision.as_ref()
    }

    /// Selected category.
    #[must_use]
    pub fn category_filter(&self) -> &str {
        &self.category_filter
    }

    /// Current search query.
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Liked listings restricted to the selected category.
    #[must_use]
    pub fn filtered_liked(&self) -> Vec<Listing> {
        filter::by_category(&self.liked, &self.category_filter)
    }

    /// [`Self::filtered_liked`] further restricted by the search query.
    #[must_use]
    pub fn searched_and_filtered_liked(&self) -> Vec<Listing> {
        filter::by_query(&self.filtered_liked(), &self.search_query)
    }

    /// Serializable snapshot of the browsing state.
    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            current: self.current().cloned(),
            queue: self.queue.clone(),
            liked_count: self.liked.len(),
            last_decision: self.last_decision.clone(),
            category_filter: self.category_filter.clone(),
            search_query: self.search_query.clone(),
        }
    }
}

impl Default for SwipeSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only projection of a [`SwipeSession`].
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionView {
    /// Card currently presented, if any.
    pub current: Option<Listing>,
    /// Undecided listings; the last one is `current`.
    pub queue: Vec<Listing>,
    /// Size of the liked set.
    pub liked_count: usize,
    /// Decision an undo would revert.
    pub last_decision: Option<Decision>,
    /// Selected category.
    pub category_filter: String,
    /// Current search query.
    pub search_query: String,
}
