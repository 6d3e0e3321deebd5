//! Listing feed adapters.
//!
//! A [`FeedAdapter`] exposes two live subscriptions (all listings, and the
//! listings liked by one user) and the two mutations that change the liked
//! relation. The session service only talks to this trait.
//!
//! - [`InMemoryFeed`]: process-local store with fault injection.
//! - [`FirebaseFeed`]: Firebase Realtime Database over REST streaming.

pub mod firebase;
pub mod memory;
pub mod subscription;
pub mod tree;

use async_trait::async_trait;

use crate::domain::{Listing, ListingId, UserId};
use crate::error::FeedError;

pub use firebase::FirebaseFeed;
pub use memory::InMemoryFeed;
pub use subscription::FeedSubscription;

/// Remote source of listings and of the per-user liked relation.
///
/// Subscriptions start delivering immediately and keep running until the
/// returned handle is unsubscribed or dropped. An `Err` item is terminal.
#[async_trait]
pub trait FeedAdapter: Send + Sync + std::fmt::Debug {
    /// Subscribes to full snapshots of the listing collection.
    fn subscribe_listings(&self) -> FeedSubscription<Vec<Listing>>;

    /// Subscribes to full snapshots of the listings liked by `user_id`.
    fn subscribe_liked(&self, user_id: &UserId) -> FeedSubscription<Vec<Listing>>;

    /// Marks `listing_id` as liked by `user_id` in durable storage.
    ///
    /// # Errors
    ///
    /// Returns a [`FeedError`] if the write is rejected or cannot be sent.
    async fn like(&self, listing_id: &ListingId, user_id: &UserId) -> Result<(), FeedError>;

    /// Removes the liked relation between `user_id` and `listing_id`.
    ///
    /// # Errors
    ///
    /// Returns a [`FeedError`] if the write is rejected or cannot be sent.
    async fn dislike(&self, listing_id: &ListingId, user_id: &UserId) -> Result<(), FeedError>;
}
