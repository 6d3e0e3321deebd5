//! Shared fixtures for the integration tests.

#![allow(dead_code, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use house_swipe::app_state::AppState;
use house_swipe::build_app;
use house_swipe::domain::{EventBus, Listing, ListingId, UserId};
use house_swipe::feed::InMemoryFeed;
use house_swipe::service::SessionService;
use tower::ServiceExt;

/// A running session served by the full router.
pub struct TestApp {
    pub feed: InMemoryFeed,
    pub service: Arc<SessionService>,
    pub router: Router,
}

pub fn listing(id: &str, property_type: &str) -> Listing {
    Listing {
        id: ListingId::new(id),
        title: format!("Woning {id}"),
        price: 350_000,
        address: format!("Kerkstraat {id}, Gent"),
        property_type: property_type.to_string(),
        latitude: 51.05,
        longitude: 3.72,
        agent_name: "Els Peeters".to_string(),
        ..Listing::default()
    }
}

/// Starts a session over `listings` and waits until the queue is loaded.
pub async fn spawn_app(listings: Vec<Listing>) -> TestApp {
    let expected = listings.len();
    let feed = InMemoryFeed::with_listings(8, listings);
    let service = SessionService::start(
        Arc::new(feed.clone()),
        UserId::new("user_123"),
        EventBus::new(256),
    );
    eventually(|| {
        let service = Arc::clone(&service);
        async move { service.view().await.queue.len() == expected }
    })
    .await;
    let router = build_app(AppState::new(Arc::clone(&service)));
    TestApp {
        feed,
        service,
        router,
    }
}

/// Polls `check` until it holds, failing after two seconds.
pub async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let outcome = tokio::time::timeout(Duration::from_secs(2), async {
        while !check().await {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    if outcome.is_err() {
        panic!("condition not reached in time");
    }
}

impl TestApp {
    /// Sends a request through the router and returns status and JSON body.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        };
        let Ok(request) = request else {
            panic!("request should build");
        };
        let Ok(response) = self.router.clone().oneshot(request).await else {
            panic!("router should answer");
        };
        read_json(response).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.request("GET", uri, None).await
    }
}

async fn read_json(response: Response<Body>) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("body should be readable");
    };
    if bytes.is_empty() {
        return (status, serde_json::Value::Null);
    }
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}
