//! Session service: owns the swipe session, pumps feed snapshots into it,
//! and issues the remote mutations that follow each decision.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::domain::chat::{self, ChatThread};
use crate::domain::map::{self, LatLng, MapBounds, MapMarker};
use crate::domain::{
    Decision, Direction, EventBus, FeedKind, Listing, ListingId, Screen, SessionEvent,
    SessionView, SwipeSession, UserId,
};
use crate::error::SwipeError;
use crate::feed::{FeedAdapter, FeedSubscription};

/// Map projection of the category-filtered liked set.
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct MapView {
    /// One marker per liked listing with coordinates.
    pub markers: Vec<MapMarker>,
    /// Box the camera should fit, absent when there are no markers.
    pub bounds: Option<MapBounds>,
    /// Fallback camera centre.
    pub default_center: LatLng,
}

/// Single logical owner of one user's [`SwipeSession`].
///
/// Every intent follows the same pattern: take the write lock → apply the
/// local (optimistic) change → release the lock → emit events → spawn the
/// remote mutation without waiting for it. Feed snapshots are applied by
/// two pump tasks started in [`SessionService::start`].
#[derive(Debug)]
pub struct SessionService {
    session: Arc<RwLock<SwipeSession>>,
    screen: RwLock<Screen>,
    feed: Arc<dyn FeedAdapter>,
    user_id: UserId,
    event_bus: EventBus,
    pumps: Mutex<Vec<JoinHandle<()>>>,
}

impl SessionService {
    /// Creates the session and subscribes to both feed streams.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn start(feed: Arc<dyn FeedAdapter>, user_id: UserId, event_bus: EventBus) -> Arc<Self> {
        let session = Arc::new(RwLock::new(SwipeSession::new()));

        let listings = feed.subscribe_listings();
        let liked = feed.subscribe_liked(&user_id);
        let pumps = vec![
            tokio::spawn(pump(
                FeedKind::Listings,
                listings,
                Arc::clone(&session),
                event_bus.clone(),
            )),
            tokio::spawn(pump(
                FeedKind::Liked,
                liked,
                Arc::clone(&session),
                event_bus.clone(),
            )),
        ];

        tracing::info!(user_id = %user_id, "swipe session started");
        Arc::new(Self {
            session,
            screen: RwLock::new(Screen::default()),
            feed,
            user_id,
            event_bus,
            pumps: Mutex::new(pumps),
        })
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// User this session belongs to.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Snapshot of the browsing state.
    pub async fn view(&self) -> SessionView {
        self.session.read().await.view()
    }

    /// Card currently presented.
    ///
    /// # Errors
    ///
    /// Returns [`SwipeError::QueueEmpty`] when no listing is left.
    pub async fn current(&self) -> Result<Listing, SwipeError> {
        self.session
            .read()
            .await
            .current()
            .cloned()
            .ok_or(SwipeError::QueueEmpty)
    }

    /// Likes the current card.
    ///
    /// # Errors
    ///
    /// Returns [`SwipeError::QueueEmpty`] when no listing is left.
    pub async fn like_current(&self) -> Result<Decision, SwipeError> {
        self.decide_current(Direction::Like).await
    }

    /// Dislikes the current card.
    ///
    /// # Errors
    ///
    /// Returns [`SwipeError::QueueEmpty`] when no listing is left.
    pub async fn dislike_current(&self) -> Result<Decision, SwipeError> {
        self.decide_current(Direction::Dislike).await
    }

    /// Likes a queued listing. Returns `None` if the listing is not in the
    /// queue (already decided, or never shown); nothing is sent then.
    pub async fn like(&self, listing_id: &ListingId) -> Option<Decision> {
        self.decide(listing_id, Direction::Like).await
    }

    /// Dislikes a queued listing. Returns `None` if the listing is not in
    /// the queue; nothing is sent then.
    pub async fn dislike(&self, listing_id: &ListingId) -> Option<Decision> {
        self.decide(listing_id, Direction::Dislike).await
    }

    /// Decides on `target`, or on the current card when `target` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`SwipeError::QueueEmpty`] when no target is given and no
    /// listing is left.
    pub async fn swipe(
        &self,
        direction: Direction,
        target: Option<&ListingId>,
    ) -> Result<Option<Decision>, SwipeError> {
        match target {
            Some(listing_id) => Ok(self.decide(listing_id, direction).await),
            None => self.decide_current(direction).await.map(Some),
        }
    }

    async fn decide_current(&self, direction: Direction) -> Result<Decision, SwipeError> {
        let decision = {
            let mut session = self.session.write().await;
            let listing = session.current().cloned().ok_or(SwipeError::QueueEmpty)?;
            record(&mut session, listing, direction)
        };
        self.after_decision(&decision).await;
        Ok(decision)
    }

    async fn decide(&self, listing_id: &ListingId, direction: Direction) -> Option<Decision> {
        let decision = {
            let mut session = self.session.write().await;
            let Some(listing) = session.queued(listing_id).cloned() else {
                tracing::debug!(%listing_id, %direction, "listing not in queue; ignoring decision");
                return None;
            };
            record(&mut session, listing, direction)
        };
        self.after_decision(&decision).await;
        Some(decision)
    }

    async fn after_decision(&self, decision: &Decision) {
        let current = self.session.read().await.current().map(|l| l.id.clone());
        let listing_id = decision.listing.id.clone();
        tracing::info!(%listing_id, direction = %decision.direction, "decision recorded");
        let _ = self.event_bus.publish(SessionEvent::DecisionRecorded {
            listing_id: listing_id.clone(),
            direction: decision.direction,
            current,
            timestamp: Utc::now(),
        });
        self.spawn_mutation(listing_id, decision.direction);
    }

    /// Restores the last decided listing as the current card.
    ///
    /// Returns `None` when there is nothing to undo. The remote like/dislike
    /// already sent for that decision is not reversed.
    pub async fn undo(&self) -> Option<Decision> {
        let decision = self.session.write().await.undo()?;
        tracing::info!(listing_id = %decision.listing.id, direction = %decision.direction, "decision undone");
        let _ = self.event_bus.publish(SessionEvent::DecisionUndone {
            listing_id: decision.listing.id.clone(),
            direction: decision.direction,
            timestamp: Utc::now(),
        });
        Some(decision)
    }

    /// Sends a dislike for a liked listing. The liked set changes only when
    /// the feed delivers its next liked snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SwipeError::LikedListingNotFound`] if the listing is not in
    /// the liked set.
    pub async fn remove_from_liked(&self, listing_id: &ListingId) -> Result<(), SwipeError> {
        let known = self.session.read().await.liked_listing(listing_id).is_some();
        if !known {
            return Err(SwipeError::LikedListingNotFound(listing_id.clone()));
        }
        tracing::info!(%listing_id, "removing listing from liked set");
        self.spawn_mutation(listing_id.clone(), Direction::Dislike);
        Ok(())
    }

    /// Selects the liked-set category.
    pub async fn set_category_filter(&self, category: &str) -> Vec<Listing> {
        let mut session = self.session.write().await;
        session.set_category_filter(category);
        self.filters_changed(&session)
    }

    /// Sets the liked-set search query.
    pub async fn set_search_query(&self, query: &str) -> Vec<Listing> {
        let mut session = self.session.write().await;
        session.set_search_query(query);
        self.filters_changed(&session)
    }

    fn filters_changed(&self, session: &SwipeSession) -> Vec<Listing> {
        let matching = session.searched_and_filtered_liked();
        let _ = self.event_bus.publish(SessionEvent::FiltersChanged {
            category: session.category_filter().to_string(),
            query: session.search_query().to_string(),
            matching: matching.len(),
            timestamp: Utc::now(),
        });
        matching
    }

    /// Liked listings after category filter and search.
    pub async fn liked(&self) -> Vec<Listing> {
        self.session.read().await.searched_and_filtered_liked()
    }

    /// Map markers for the category-filtered liked set.
    pub async fn map(&self) -> MapView {
        let listings = self.session.read().await.filtered_liked();
        let markers = map::markers(&listings);
        let bounds = map::bounds(&markers);
        MapView {
            markers,
            bounds,
            default_center: map::DEFAULT_CENTER,
        }
    }

    /// One chat thread per liked listing.
    pub async fn chats(&self) -> Vec<ChatThread> {
        chat::threads(self.session.read().await.liked())
    }

    /// Screen currently presented.
    pub async fn current_screen(&self) -> Screen {
        *self.screen.read().await
    }

    /// Presents `screen`.
    pub async fn navigate(&self, screen: Screen) -> Screen {
        let previous = std::mem::replace(&mut *self.screen.write().await, screen);
        if previous != screen {
            tracing::debug!(from = %previous, to = %screen, "navigated");
            let _ = self.event_bus.publish(SessionEvent::NavigationChanged {
                screen,
                timestamp: Utc::now(),
            });
        }
        screen
    }

    /// Ends the session: stops both pumps, which releases the feed
    /// subscriptions. State stays readable but is no longer refreshed.
    pub fn shutdown(&self) {
        let pumps = match self.pumps.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        for pump in &pumps {
            pump.abort();
        }
        if !pumps.is_empty() {
            tracing::info!(user_id = %self.user_id, "swipe session stopped");
        }
    }

    /// Sends the remote mutation for a decision without waiting for it.
    /// A failure is logged and published; the local queue is left as is.
    fn spawn_mutation(&self, listing_id: ListingId, direction: Direction) {
        let feed = Arc::clone(&self.feed);
        let user_id = self.user_id.clone();
        let event_bus = self.event_bus.clone();
        tokio::spawn(async move {
            let result = match direction {
                Direction::Like => feed.like(&listing_id, &user_id).await,
                Direction::Dislike => feed.dislike(&listing_id, &user_id).await,
            };
            if let Err(err) = result {
                tracing::warn!(%listing_id, %direction, error = %err, "feed mutation failed");
                let _ = event_bus.publish(SessionEvent::MutationFailed {
                    listing_id,
                    direction,
                    message: err.to_string(),
                    timestamp: Utc::now(),
                });
            }
        });
    }
}

impl Drop for SessionService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn record(session: &mut SwipeSession, listing: Listing, direction: Direction) -> Decision {
    session.decide(listing.clone(), direction);
    Decision::new(listing, direction)
}

/// Applies one subscription's snapshots until it ends. On error the last
/// applied state is kept and no further snapshots are taken.
async fn pump(
    kind: FeedKind,
    mut subscription: FeedSubscription<Vec<Listing>>,
    session: Arc<RwLock<SwipeSession>>,
    event_bus: EventBus,
) {
    while let Some(item) = subscription.next().await {
        let snapshot = match item {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(feed = ?kind, error = %err, "feed subscription failed; keeping last state");
                let _ = event_bus.publish(SessionEvent::SubscriptionFailed {
                    feed: kind,
                    message: err.to_string(),
                    timestamp: Utc::now(),
                });
                return;
            }
        };

        let event = {
            let mut session = session.write().await;
            match kind {
                FeedKind::Listings => {
                    session.on_feed_snapshot(snapshot);
                    SessionEvent::QueueUpdated {
                        queue_len: session.queue().len(),
                        current: session.current().map(|l| l.id.clone()),
                        timestamp: Utc::now(),
                    }
                }
                FeedKind::Liked => {
                    session.on_liked_snapshot(snapshot);
                    SessionEvent::LikedUpdated {
                        liked_count: session.liked().len(),
                        timestamp: Utc::now(),
                    }
                }
            }
        };
        tracing::debug!(event = event.event_type_str(), "feed snapshot applied");
        let _ = event_bus.publish(event);
    }
    tracing::debug!(feed = ?kind, "feed subscription ended");
}
