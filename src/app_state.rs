//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::SessionService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Session service for all swipe logic.
    pub session_service: Arc<SessionService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}

impl AppState {
    /// Builds the state around a running session.
    #[must_use]
    pub fn new(session_service: Arc<SessionService>) -> Self {
        let event_bus = session_service.event_bus().clone();
        Self {
            session_service,
            event_bus,
        }
    }
}
