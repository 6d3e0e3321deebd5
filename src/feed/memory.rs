//! Process-local listing feed.
//!
//! [`InMemoryFeed`] keeps the listing collection and the liked relation in
//! a [`tokio::sync::watch`] channel. Every subscription re-projects the store
//! whenever it changes, so it behaves like a realtime database listener:
//! an initial snapshot on subscribe, then one snapshot per change.
//!
//! Failures can be injected for tests: [`InMemoryFeed::fail_mutations`]
//! makes `like`/`dislike` return an error, and
//! [`InMemoryFeed::disconnect`] ends every open subscription with an error.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::{FeedAdapter, tree};
use super::subscription::{FeedSubscription, SnapshotSender};
use crate::domain::{Listing, ListingId, UserId};
use crate::error::FeedError;

/// Seed document: a list of houses plus collection metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HousesDocument {
    /// Listing records. Records without an id are keyed by position.
    pub houses: Vec<Listing>,
    /// Collection metadata.
    pub metadata: FeedMetadata,
}

/// Metadata published alongside the listing collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeedMetadata {
    /// Number of listings in the collection.
    pub total: u32,
    /// Last update in epoch milliseconds.
    pub last_updated: i64,
    /// Data set version.
    pub version: String,
}

#[derive(Debug, Clone, Default)]
struct FeedStore {
    listings: BTreeMap<ListingId, Listing>,
    likes: HashMap<UserId, BTreeSet<ListingId>>,
}

impl FeedStore {
    fn listings(&self) -> Vec<Listing> {
        in_key_order(self.listings.values())
    }

    fn liked(&self, user_id: &UserId) -> Vec<Listing> {
        let Some(ids) = self.likes.get(user_id) else {
            return Vec::new();
        };
        in_key_order(
            self.listings
                .values()
                .filter(|listing| ids.contains(&listing.id)),
        )
    }
}

/// Orders listings the way the Realtime Database orders child keys, so both
/// backends present the same feed order for the same document.
fn in_key_order<'a>(listings: impl Iterator<Item = &'a Listing>) -> Vec<Listing> {
    let mut ordered: Vec<Listing> = listings.cloned().collect();
    ordered.sort_by(|a, b| tree::key_order(a.id.as_str()).cmp(&tree::key_order(b.id.as_str())));
    ordered
}

#[derive(Debug)]
struct Inner {
    store: watch::Sender<FeedStore>,
    outage: watch::Sender<Option<String>>,
    fail_mutations: AtomicBool,
    channel_capacity: usize,
}

/// In-memory [`FeedAdapter`] with live snapshot delivery.
///
/// Cloning is cheap; clones share the same store.
#[derive(Debug, Clone)]
pub struct InMemoryFeed {
    inner: Arc<Inner>,
}

impl InMemoryFeed {
    /// Creates an empty feed whose subscriptions buffer up to
    /// `channel_capacity` snapshots.
    #[must_use]
    pub fn new(channel_capacity: usize) -> Self {
        let (store, _) = watch::channel(FeedStore::default());
        let (outage, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                store,
                outage,
                fail_mutations: AtomicBool::new(false),
                channel_capacity,
            }),
        }
    }

    /// Creates a feed holding `listings`.
    #[must_use]
    pub fn with_listings(channel_capacity: usize, listings: impl IntoIterator<Item = Listing>) -> Self {
        let feed = Self::new(channel_capacity);
        for listing in listings {
            feed.upsert(listing);
        }
        feed
    }

    /// Creates a feed from a seed document. Records without an id are keyed
    /// by their position in the document.
    #[must_use]
    pub fn from_document(channel_capacity: usize, document: HousesDocument) -> Self {
        let listings = document
            .houses
            .into_iter()
            .enumerate()
            .map(|(index, listing)| {
                if listing.id.is_empty() {
                    listing.with_id(ListingId::new(index.to_string()))
                } else {
                    listing
                }
            });
        Self::with_listings(channel_capacity, listings)
    }

    /// Parses a JSON seed document.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Decode`] if `json` is not a valid document.
    pub fn from_json(channel_capacity: usize, json: &str) -> Result<Self, FeedError> {
        let document: HousesDocument = serde_json::from_str(json)?;
        tracing::info!(
            houses = document.houses.len(),
            version = %document.metadata.version,
            "loaded feed seed document"
        );
        Ok(Self::from_document(channel_capacity, document))
    }

    /// Inserts or replaces a listing, notifying subscribers.
    pub fn upsert(&self, listing: Listing) {
        self.inner.store.send_modify(|store| {
            store.listings.insert(listing.id.clone(), listing);
        });
    }

    /// Removes a listing and every liked relation to it.
    pub fn remove(&self, listing_id: &ListingId) {
        self.inner.store.send_modify(|store| {
            store.listings.remove(listing_id);
            for ids in store.likes.values_mut() {
                ids.remove(listing_id);
            }
        });
    }

    /// Current listing collection.
    #[must_use]
    pub fn listings(&self) -> Vec<Listing> {
        self.inner.store.borrow().listings()
    }

    /// Ids currently liked by `user_id`.
    #[must_use]
    pub fn liked_ids(&self, user_id: &UserId) -> Vec<ListingId> {
        self.inner
            .store
            .borrow()
            .likes
            .get(user_id)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Makes subsequent `like`/`dislike` calls fail (or succeed again).
    pub fn fail_mutations(&self, fail: bool) {
        self.inner.fail_mutations.store(fail, Ordering::SeqCst);
    }

    /// Ends every open subscription with an error. Subscriptions opened
    /// while disconnected fail immediately.
    pub fn disconnect(&self, reason: impl Into<String>) {
        self.inner.outage.send_replace(Some(reason.into()));
    }

    /// Lets new subscriptions succeed again after [`Self::disconnect`].
    pub fn reconnect(&self) {
        self.inner.outage.send_replace(None);
    }

    fn check_mutation(&self, action: &str, listing_id: &ListingId) -> Result<(), FeedError> {
        if self.inner.fail_mutations.load(Ordering::SeqCst) {
            return Err(FeedError::Injected(format!("{action} {listing_id} rejected")));
        }
        Ok(())
    }

    fn subscribe_projection<F>(&self, project: F) -> FeedSubscription<Vec<Listing>>
    where
        F: Fn(&FeedStore) -> Vec<Listing> + Send + 'static,
    {
        let store_rx = self.inner.store.subscribe();
        let outage_rx = self.inner.outage.subscribe();
        FeedSubscription::spawn(self.inner.channel_capacity, move |tx| {
            pump(store_rx, outage_rx, tx, project)
        })
    }
}

async fn pump<F>(
    mut store_rx: watch::Receiver<FeedStore>,
    mut outage_rx: watch::Receiver<Option<String>>,
    tx: SnapshotSender<Vec<Listing>>,
    project: F,
) where
    F: Fn(&FeedStore) -> Vec<Listing> + Send + 'static,
{
    loop {
        let outage = outage_rx.borrow_and_update().clone();
        if let Some(reason) = outage {
            let _ = tx.send(Err(FeedError::Injected(reason))).await;
            return;
        }
        let snapshot = project(&store_rx.borrow_and_update());
        if tx.send(Ok(snapshot)).await.is_err() {
            return;
        }
        tokio::select! {
            changed = store_rx.changed() => {
                if changed.is_err() {
                    return;
                }
            }
            changed = outage_rx.changed() => {
                if changed.is_err() {
                    return;
                }
            }
        }
    }
}

#[async_trait]
impl FeedAdapter for InMemoryFeed {
    fn subscribe_listings(&self) -> FeedSubscription<Vec<Listing>> {
        self.subscribe_projection(FeedStore::listings)
    }

    fn subscribe_liked(&self, user_id: &UserId) -> FeedSubscription<Vec<Listing>> {
        let user_id = user_id.clone();
        self.subscribe_projection(move |store| store.liked(&user_id))
    }

    async fn like(&self, listing_id: &ListingId, user_id: &UserId) -> Result<(), FeedError> {
        self.check_mutation("like", listing_id)?;
        self.inner.store.send_modify(|store| {
            store
                .likes
                .entry(user_id.clone())
                .or_default()
                .insert(listing_id.clone());
            if let Some(listing) = store.listings.get_mut(listing_id) {
                listing.is_liked = true;
            }
        });
        Ok(())
    }

    async fn dislike(&self, listing_id: &ListingId, user_id: &UserId) -> Result<(), FeedError> {
        self.check_mutation("dislike", listing_id)?;
        self.inner.store.send_modify(|store| {
            if let Some(ids) = store.likes.get_mut(user_id) {
                ids.remove(listing_id);
            }
            if let Some(listing) = store.listings.get_mut(listing_id) {
                listing.is_liked = false;
            }
        });
        Ok(())
    }
}
