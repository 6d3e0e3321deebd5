//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams session events to clients that
//! subscribed to their topic and accepts swipe commands.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
