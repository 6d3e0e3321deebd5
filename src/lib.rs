//! # house-swipe
//!
//! Swipe-session engine and REST/WebSocket gateway for real-estate
//! listing feeds.
//!
//! A user swipes through a stack of listings: liking one records it in a
//! per-user liked collection, disliking discards it, and the last decision
//! can be undone. The liked set is filtered by category and free text and
//! projected into map markers and chat threads. Listings and the liked set
//! come from a live feed (Firebase Realtime Database or an in-memory store).
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── SessionService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── SwipeSession (domain/)
//!     │
//!     └── FeedAdapter (feed/): Firebase REST streaming | in-memory
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod feed;
pub mod service;
pub mod ws;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use app_state::AppState;

/// Builds the complete application: REST API, WebSocket endpoint, and the
/// HTTP middleware stack.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws::handler::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
