//! Service layer: session orchestration.
//!
//! [`SessionService`] owns the swipe session, applies feed snapshots,
//! runs user intents, and emits events through the
//! [`super::domain::EventBus`].

pub mod session_service;

pub use session_service::{MapView, SessionService};
