//! Per-connection subscription manager.
//!
//! Tracks which event topics a WebSocket client is subscribed to and
//! provides server-side event filtering.

use std::collections::HashSet;

use crate::domain::Topic;

/// Wildcard topic name.
pub const WILDCARD: &str = "*";

/// Manages the set of topic subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed topics. If `subscribe_all` is true, this set is ignored.
    topics: HashSet<Topic>,
    /// Whether the client subscribes to all topics (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds topics to the subscription set. `"*"` enables the wildcard.
    ///
    /// Returns the names that are not known topics.
    pub fn subscribe(&mut self, names: &[String]) -> Vec<String> {
        let mut rejected = Vec::new();
        for name in names {
            if name == WILDCARD {
                self.subscribe_all = true;
                continue;
            }
            match name.parse::<Topic>() {
                Ok(topic) => {
                    self.topics.insert(topic);
                }
                Err(_) => rejected.push(name.clone()),
            }
        }
        rejected
    }

    /// Removes topics from the subscription set. `"*"` clears the wildcard.
    pub fn unsubscribe(&mut self, names: &[String]) {
        for name in names {
            if name == WILDCARD {
                self.subscribe_all = false;
            } else if let Ok(topic) = name.parse::<Topic>() {
                self.topics.remove(&topic);
            }
        }
    }

    /// Returns `true` if events of `topic` should be forwarded.
    #[must_use]
    pub fn matches(&self, topic: Topic) -> bool {
        self.subscribe_all || self.topics.contains(&topic)
    }

    /// Explicitly subscribed topic names, sorted.
    #[must_use]
    pub fn topics(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.topics.iter().map(|t| t.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn empty_matches_nothing() {
        let mgr = SubscriptionManager::new();
        assert!(!mgr.matches(Topic::Queue));
    }

    #[test]
    fn subscribe_specific_topic() {
        let mut mgr = SubscriptionManager::new();
        assert!(mgr.subscribe(&names(&["liked"])).is_empty());
        assert!(mgr.matches(Topic::Liked));
        assert!(!mgr.matches(Topic::Queue));
    }

    #[test]
    fn wildcard_matches_everything() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&names(&["*"]));
        assert!(mgr.matches(Topic::Queue));
        assert!(mgr.matches(Topic::Errors));
        mgr.unsubscribe(&names(&["*"]));
        assert!(!mgr.matches(Topic::Errors));
    }

    #[test]
    fn unknown_topics_are_reported() {
        let mut mgr = SubscriptionManager::new();
        let rejected = mgr.subscribe(&names(&["queue", "auctions"]));
        assert_eq!(rejected, ["auctions"]);
        assert_eq!(mgr.topics(), ["queue"]);
    }

    #[test]
    fn unsubscribe_removes_topic() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&names(&["queue", "navigation"]));
        mgr.unsubscribe(&names(&["queue"]));
        assert!(!mgr.matches(Topic::Queue));
        assert_eq!(mgr.topics(), ["navigation"]);
    }
}
