//! house-swipe server entry point.
//!
//! Starts the swipe session for the configured user and serves the REST
//! and WebSocket endpoints.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use house_swipe::app_state::AppState;
use house_swipe::build_app;
use house_swipe::config::{FeedBackend, SwipeConfig};
use house_swipe::domain::{EventBus, UserId};
use house_swipe::feed::{FeedAdapter, FirebaseFeed, InMemoryFeed};
use house_swipe::service::SessionService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = SwipeConfig::from_env()?;
    tracing::info!(
        addr = %config.listen_addr,
        user_id = %config.user_id,
        backend = ?config.feed_backend,
        "starting house-swipe"
    );

    // Build feed and session
    let feed = build_feed(&config)?;
    let event_bus = EventBus::new(config.event_bus_capacity);
    let session_service = SessionService::start(feed, UserId::new(config.user_id.as_str()), event_bus);

    // Build router
    let app = build_app(AppState::new(Arc::clone(&session_service)));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    session_service.shutdown();
    Ok(())
}

fn build_feed(config: &SwipeConfig) -> anyhow::Result<Arc<dyn FeedAdapter>> {
    match config.feed_backend {
        FeedBackend::Memory => {
            let feed = match &config.feed_seed_file {
                Some(path) => {
                    let json = std::fs::read_to_string(path)
                        .with_context(|| format!("reading feed seed {}", path.display()))?;
                    let feed = InMemoryFeed::from_json(config.feed_channel_capacity, &json)
                        .with_context(|| format!("decoding feed seed {}", path.display()))?;
                    tracing::info!(path = %path.display(), listings = feed.listings().len(), "memory feed seeded");
                    feed
                }
                None => InMemoryFeed::new(config.feed_channel_capacity),
            };
            Ok(Arc::new(feed))
        }
        FeedBackend::Firebase => {
            let url = config
                .firebase_database_url
                .as_deref()
                .context("FIREBASE_DATABASE_URL is required for the firebase backend")?;
            Ok(Arc::new(FirebaseFeed::new(
                url,
                config.firebase_auth_token.clone(),
                config.feed_channel_capacity,
            )))
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown requested");
}
