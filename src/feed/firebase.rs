//! Firebase Realtime Database feed over the REST API.
//!
//! Data layout:
//!
//! ```text
//! houses/{houseId}                 listing record
//! liked_houses/{userId}/{houseId}  true while liked
//! ```
//!
//! Subscriptions use REST streaming (`Accept: text/event-stream`). The
//! server sends `put`/`patch` events with a `{ "path", "data" }` payload,
//! periodic `keep-alive` events, and `cancel`/`auth_revoked` when access is
//! withdrawn. Each subscription mirrors its subtree locally and emits a full
//! snapshot after every change. A broken stream ends the subscription with
//! an error; reconnecting is left to the caller.

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;

use super::subscription::{FeedSubscription, SnapshotSender};
use super::{FeedAdapter, tree};
use crate::domain::{Listing, ListingId, UserId};
use crate::error::FeedError;

const HOUSES: &str = "houses";
const LIKED_HOUSES: &str = "liked_houses";

/// Payload of a `put` or `patch` stream event.
#[derive(Debug, Deserialize)]
struct StreamPayload {
    path: String,
    data: Value,
}

#[derive(Debug, Clone, Copy)]
enum Projection {
    Listings,
    Liked,
}

/// [`FeedAdapter`] backed by a Firebase Realtime Database.
#[derive(Debug, Clone)]
pub struct FirebaseFeed {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
    channel_capacity: usize,
}

impl FirebaseFeed {
    /// Creates a feed for the database at `base_url`
    /// (e.g. `https://<db>.europe-west1.firebasedatabase.app`).
    #[must_use]
    pub fn new(base_url: &str, auth_token: Option<String>, channel_capacity: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
            channel_capacity,
        }
    }

    /// REST URL of `path`, with the auth parameter when configured.
    fn url(&self, path: &str) -> String {
        let mut url = format!("{}/{}.json", self.base_url, path.trim_matches('/'));
        if let Some(token) = &self.auth_token {
            url.push_str("?auth=");
            url.push_str(token);
        }
        url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Response, FeedError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                url: format!("{}/{}.json", self.base_url, path),
            });
        }
        Ok(response)
    }

    async fn write(&self, path: &str, value: Option<bool>) -> Result<(), FeedError> {
        let request = match value {
            Some(flag) => self.request(Method::PUT, path).json(&flag),
            None => self.request(Method::DELETE, path),
        };
        self.send(request, path).await?;
        tracing::debug!(path, ?value, "feed write");
        Ok(())
    }

    async fn fetch(&self, path: &str) -> Result<Value, FeedError> {
        let response = self.send(self.request(Method::GET, path), path).await?;
        Ok(response.json::<Value>().await?)
    }

    fn subscribe(&self, path: String, projection: Projection) -> FeedSubscription<Vec<Listing>> {
        let feed = self.clone();
        FeedSubscription::spawn(self.channel_capacity, move |tx| async move {
            match feed.follow(&path, projection, &tx).await {
                Ok(()) => tracing::debug!(%path, "feed subscription released"),
                Err(err) => {
                    tracing::warn!(%path, error = %err, "feed subscription failed");
                    let _ = tx.send(Err(err)).await;
                }
            }
        })
    }

    /// Streams `path` until the receiver goes away (`Ok`) or the stream
    /// fails (`Err`).
    async fn follow(
        &self,
        path: &str,
        projection: Projection,
        tx: &SnapshotSender<Vec<Listing>>,
    ) -> Result<(), FeedError> {
        let request = self
            .request(Method::GET, path)
            .header(ACCEPT, "text/event-stream");
        let response = self.send(request, path).await?;
        tracing::info!(path, "feed stream opened");

        let mut events = response.bytes_stream().eventsource();
        let mut mirror = Value::Null;

        while let Some(event) = events.next().await {
            let event = event.map_err(|e| FeedError::Stream(e.to_string()))?;
            match event.event.as_str() {
                "put" | "patch" => {
                    let payload: StreamPayload = serde_json::from_str(&event.data)?;
                    if event.event == "put" {
                        tree::apply_put(&mut mirror, &payload.path, payload.data);
                    } else {
                        tree::apply_patch(&mut mirror, &payload.path, payload.data);
                    }
                    let snapshot = match projection {
                        Projection::Listings => tree::listings(&mirror),
                        Projection::Liked => self.resolve_liked(&mirror).await?,
                    };
                    if tx.send(Ok(snapshot)).await.is_err() {
                        return Ok(());
                    }
                }
                "keep-alive" => tracing::trace!(path, "feed keep-alive"),
                "cancel" => return Err(FeedError::Cancelled(event.data)),
                "auth_revoked" => return Err(FeedError::Cancelled("auth revoked".to_string())),
                other => tracing::debug!(path, event = other, "ignoring feed event"),
            }
        }

        Err(FeedError::Stream("event stream closed".to_string()))
    }

    /// Resolves the liked ids of `relation` against a fresh read of the
    /// listing collection.
    async fn resolve_liked(&self, relation: &Value) -> Result<Vec<Listing>, FeedError> {
        let ids = tree::keys(relation);
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let houses = self.fetch(HOUSES).await?;
        Ok(tree::listings(&houses)
            .into_iter()
            .filter(|listing| ids.contains(&listing.id))
            .collect())
    }
}

fn liked_path(user_id: &UserId, listing_id: &ListingId) -> String {
    format!("{LIKED_HOUSES}/{user_id}/{listing_id}")
}

fn is_liked_path(listing_id: &ListingId) -> String {
    format!("{HOUSES}/{listing_id}/isLiked")
}

#[async_trait]
impl FeedAdapter for FirebaseFeed {
    fn subscribe_listings(&self) -> FeedSubscription<Vec<Listing>> {
        self.subscribe(HOUSES.to_string(), Projection::Listings)
    }

    fn subscribe_liked(&self, user_id: &UserId) -> FeedSubscription<Vec<Listing>> {
        self.subscribe(format!("{LIKED_HOUSES}/{user_id}"), Projection::Liked)
    }

    async fn like(&self, listing_id: &ListingId, user_id: &UserId) -> Result<(), FeedError> {
        self.write(&liked_path(user_id, listing_id), Some(true)).await?;
        self.write(&is_liked_path(listing_id), Some(true)).await
    }

    async fn dislike(&self, listing_id: &ListingId, user_id: &UserId) -> Result<(), FeedError> {
        self.write(&liked_path(user_id, listing_id), None).await?;
        self.write(&is_liked_path(listing_id), Some(false)).await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::time::Duration;

    use mockito::Matcher;
    use tokio_test::assert_ok;

    const EVENT_STREAM: &str = "text/event-stream";

    fn user() -> UserId {
        UserId::new("user_1")
    }

    async fn next_item(
        sub: &mut FeedSubscription<Vec<Listing>>,
    ) -> Option<Result<Vec<Listing>, FeedError>> {
        let Ok(item) = tokio::time::timeout(Duration::from_secs(2), sub.next()).await else {
            panic!("subscription produced nothing in time");
        };
        item
    }

    async fn next_snapshot(sub: &mut FeedSubscription<Vec<Listing>>) -> Vec<Listing> {
        let Some(Ok(snapshot)) = next_item(sub).await else {
            panic!("expected a snapshot");
        };
        snapshot
    }

    fn ids(listings: &[Listing]) -> Vec<&str> {
        listings.iter().map(|l| l.id.as_str()).collect()
    }

    #[tokio::test]
    async fn like_writes_relation_then_flag() {
        let mut server = mockito::Server::new_async().await;
        let relation = server
            .mock("PUT", "/liked_houses/user_1/h1.json")
            .match_body("true")
            .with_status(200)
            .with_body("true")
            .create_async()
            .await;
        let flag = server
            .mock("PUT", "/houses/h1/isLiked.json")
            .match_body("true")
            .with_status(200)
            .with_body("true")
            .create_async()
            .await;

        let feed = FirebaseFeed::new(&server.url(), None, 4);
        assert_ok!(feed.like(&ListingId::new("h1"), &user()).await);
        relation.assert_async().await;
        flag.assert_async().await;
    }

    #[tokio::test]
    async fn dislike_deletes_relation_and_clears_flag() {
        let mut server = mockito::Server::new_async().await;
        let relation = server
            .mock("DELETE", "/liked_houses/user_1/h1.json")
            .with_status(200)
            .with_body("null")
            .create_async()
            .await;
        let flag = server
            .mock("PUT", "/houses/h1/isLiked.json")
            .match_body("false")
            .with_status(200)
            .with_body("false")
            .create_async()
            .await;

        let feed = FirebaseFeed::new(&server.url(), None, 4);
        assert_ok!(feed.dislike(&ListingId::new("h1"), &user()).await);
        relation.assert_async().await;
        flag.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_relation_write_skips_flag_and_maps_status() {
        let mut server = mockito::Server::new_async().await;
        let relation = server
            .mock("PUT", "/liked_houses/user_1/h1.json")
            .match_query(Matcher::UrlEncoded("auth".into(), "tok".into()))
            .with_status(401)
            .with_body(r#"{"error":"Permission denied"}"#)
            .create_async()
            .await;
        let flag = server
            .mock("PUT", "/houses/h1/isLiked.json")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let feed = FirebaseFeed::new(&server.url(), Some("tok".to_string()), 4);
        let Err(FeedError::Status { status, url }) = feed.like(&ListingId::new("h1"), &user()).await
        else {
            panic!("expected a status error");
        };
        assert_eq!(status, 401);
        assert!(url.ends_with("/liked_houses/user_1/h1.json"));
        assert!(!url.contains("tok"));
        relation.assert_async().await;
        flag.assert_async().await;
    }

    #[tokio::test]
    async fn listing_stream_applies_put_and_patch_until_cancel() {
        let mut server = mockito::Server::new_async().await;
        let body = concat!(
            "event: put\n",
            "data: {\"path\":\"/\",\"data\":{\"h2\":{\"title\":\"Villa B\"},\"h1\":{\"title\":\"Loft A\"}}}\n\n",
            "event: keep-alive\n",
            "data: null\n\n",
            "event: patch\n",
            "data: {\"path\":\"/h1\",\"data\":{\"isLiked\":true}}\n\n",
            "event: cancel\n",
            "data: permission denied\n\n",
        );
        let stream = server
            .mock("GET", "/houses.json")
            .match_header("accept", EVENT_STREAM)
            .with_status(200)
            .with_header("content-type", EVENT_STREAM)
            .with_body(body)
            .create_async()
            .await;

        let feed = FirebaseFeed::new(&server.url(), None, 4);
        let mut sub = feed.subscribe_listings();

        let initial = next_snapshot(&mut sub).await;
        assert_eq!(ids(&initial), ["h1", "h2"]);
        assert!(initial.iter().all(|l| !l.is_liked));

        let patched = next_snapshot(&mut sub).await;
        assert!(patched.first().is_some_and(|l| l.id.as_str() == "h1" && l.is_liked));

        let Some(Err(FeedError::Cancelled(reason))) = next_item(&mut sub).await else {
            panic!("cancel should end the subscription");
        };
        assert_eq!(reason, "permission denied");
        assert!(next_item(&mut sub).await.is_none());
        stream.assert_async().await;
    }

    #[tokio::test]
    async fn auth_revoked_is_terminal() {
        let mut server = mockito::Server::new_async().await;
        let _stream = server
            .mock("GET", "/houses.json")
            .with_status(200)
            .with_header("content-type", EVENT_STREAM)
            .with_body("event: auth_revoked\ndata: credential is no longer valid\n\n")
            .create_async()
            .await;

        let feed = FirebaseFeed::new(&server.url(), None, 4);
        let mut sub = feed.subscribe_listings();
        let Some(Err(FeedError::Cancelled(reason))) = next_item(&mut sub).await else {
            panic!("auth_revoked should end the subscription");
        };
        assert_eq!(reason, "auth revoked");
    }

    #[tokio::test]
    async fn closed_stream_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _stream = server
            .mock("GET", "/houses.json")
            .with_status(200)
            .with_header("content-type", EVENT_STREAM)
            .with_body("event: put\ndata: {\"path\":\"/\",\"data\":null}\n\n")
            .create_async()
            .await;

        let feed = FirebaseFeed::new(&server.url(), None, 4);
        let mut sub = feed.subscribe_listings();
        assert!(next_snapshot(&mut sub).await.is_empty());
        let Some(Err(FeedError::Stream(_))) = next_item(&mut sub).await else {
            panic!("a closed stream should end the subscription with an error");
        };
    }

    #[tokio::test]
    async fn failed_stream_request_maps_status() {
        let mut server = mockito::Server::new_async().await;
        let _stream = server
            .mock("GET", "/houses.json")
            .with_status(403)
            .create_async()
            .await;

        let feed = FirebaseFeed::new(&server.url(), None, 4);
        let mut sub = feed.subscribe_listings();
        let Some(Err(FeedError::Status { status, .. })) = next_item(&mut sub).await else {
            panic!("expected a status error");
        };
        assert_eq!(status, 403);
    }

    #[tokio::test]
    async fn liked_stream_resolves_ids_against_listings() {
        let mut server = mockito::Server::new_async().await;
        let _relation = server
            .mock("GET", "/liked_houses/user_1.json")
            .match_header("accept", EVENT_STREAM)
            .with_status(200)
            .with_header("content-type", EVENT_STREAM)
            .with_body("event: put\ndata: {\"path\":\"/\",\"data\":{\"h2\":true}}\n\n")
            .create_async()
            .await;
        let houses = server
            .mock("GET", "/houses.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"h1":{"title":"Loft A"},"h2":{"title":"Villa B","isLiked":true}}"#)
            .create_async()
            .await;

        let feed = FirebaseFeed::new(&server.url(), None, 4);
        let mut sub = feed.subscribe_liked(&user());
        let liked = next_snapshot(&mut sub).await;
        assert_eq!(ids(&liked), ["h2"]);
        assert!(liked.first().is_some_and(|l| l.title == "Villa B"));
        houses.assert_async().await;
    }

    #[test]
    fn url_appends_json_suffix_and_auth() {
        let feed = FirebaseFeed::new("https://db.example.app/", Some("tok".to_string()), 4);
        assert_eq!(feed.url("/houses/"), "https://db.example.app/houses.json?auth=tok");

        let anonymous = FirebaseFeed::new("https://db.example.app", None, 4);
        assert_eq!(
            anonymous.url("liked_houses/user_123"),
            "https://db.example.app/liked_houses/user_123.json"
        );
    }

    #[test]
    fn mutation_paths_follow_layout() {
        let user = UserId::new("user_123");
        let id = ListingId::new("-Nabc");
        assert_eq!(liked_path(&user, &id), "liked_houses/user_123/-Nabc");
        assert_eq!(is_liked_path(&id), "houses/-Nabc/isLiked");
    }

    #[test]
    fn stream_payload_decodes() {
        let data = r#"{"path":"/-Nabc/isLiked","data":true}"#;
        let Ok(payload) = serde_json::from_str::<StreamPayload>(data) else {
            panic!("payload should decode");
        };
        assert_eq!(payload.path, "/-Nabc/isLiked");
        assert_eq!(payload.data, Value::Bool(true));
    }

    #[test]
    fn initial_put_then_patch_yields_listings() {
        let mut mirror = Value::Null;
        let initial: StreamPayload = serde_json::from_str(
            r#"{"path":"/","data":{"h1":{"title":"Loft A"},"h2":{"title":"Villa B","isSwiped":true}}}"#,
        )
        .unwrap_or_else(|_| panic!("initial payload"));
        tree::apply_put(&mut mirror, &initial.path, initial.data);

        let patch: StreamPayload =
            serde_json::from_str(r#"{"path":"/h1","data":{"isLiked":true}}"#)
                .unwrap_or_else(|_| panic!("patch payload"));
        tree::apply_patch(&mut mirror, &patch.path, patch.data);

        let listings = tree::listings(&mirror);
        assert_eq!(listings.len(), 2);
        assert!(listings.first().is_some_and(|l| l.is_liked && l.title == "Loft A"));
    }
}
