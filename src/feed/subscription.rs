//! Cancellable live subscription handle.

use std::fmt;
use std::future::Future;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::FeedError;

/// Sending half handed to a subscription producer.
pub type SnapshotSender<T> = mpsc::Sender<Result<T, FeedError>>;

/// Handle to a running subscription.
///
/// Snapshots are produced by a background task and delivered through a
/// bounded channel. Dropping the handle (or calling
/// [`FeedSubscription::unsubscribe`]) aborts the producer, which releases
/// whatever listener it holds on the backing store.
pub struct FeedSubscription<T> {
    receiver: mpsc::Receiver<Result<T, FeedError>>,
    producer: JoinHandle<()>,
}

impl<T: Send + 'static> FeedSubscription<T> {
    /// Spawns `producer` on the current runtime and returns the handle that
    /// receives what it sends.
    pub fn spawn<F, Fut>(capacity: usize, producer: F) -> Self
    where
        F: FnOnce(SnapshotSender<T>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let producer = tokio::spawn(producer(sender));
        Self { receiver, producer }
    }
}

impl<T> FeedSubscription<T> {
    /// Waits for the next snapshot.
    ///
    /// Returns `None` once the producer has stopped. An `Err` item means the
    /// subscription failed and nothing further will arrive.
    pub async fn next(&mut self) -> Option<Result<T, FeedError>> {
        self.receiver.recv().await
    }

    /// Stops the producer and releases the subscription.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Returns `true` while the producer task is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.producer.is_finished()
    }
}

impl<T> Drop for FeedSubscription<T> {
    fn drop(&mut self) {
        self.producer.abort();
    }
}

impl<T> fmt::Debug for FeedSubscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedSubscription")
            .field("active", &self.is_active())
            .finish()
    }
}
