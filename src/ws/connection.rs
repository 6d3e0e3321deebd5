//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding filtered events.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::api::dto::{DecisionResponse, UndoResponse};
use crate::domain::{Direction, ListingId, SessionEvent};
use crate::error::SwipeError;
use crate::service::SessionService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards events whose topic the client subscribed to.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<SessionEvent>,
    session_service: Arc<SessionService>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut subs, &session_service).await;
                        if let Ok(json) = serde_json::to_string(&response)
                            && ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            // Event from EventBus
            event = event_rx.recv() => {
                match event {
                    Ok(session_event) => {
                        if subs.matches(session_event.topic()) {
                            let msg = WsMessage::event(
                                serde_json::to_value(&session_event).unwrap_or_default(),
                            );
                            let json = serde_json::to_string(&msg).unwrap_or_default();
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Handles a text message from the client and builds the reply.
async fn handle_text_message(
    text: &str,
    subs: &mut SubscriptionManager,
    service: &SessionService,
) -> WsMessage {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return WsMessage::error("", 400, "malformed JSON");
    };
    if msg.msg_type != WsMessageType::Command {
        return WsMessage::error(msg.id, 400, "expected a command message");
    }
    let command = match serde_json::from_value::<WsCommand>(msg.payload) {
        Ok(command) => command,
        Err(err) => return WsMessage::error(msg.id, 404, format!("unknown command: {err}")),
    };

    match execute(command, subs, service).await {
        Ok(payload) => WsMessage::new(msg.id, WsMessageType::Response, payload),
        Err(err) => WsMessage::error(msg.id, err.error_code(), err.to_string()),
    }
}

async fn execute(
    command: WsCommand,
    subs: &mut SubscriptionManager,
    service: &SessionService,
) -> Result<serde_json::Value, SwipeError> {
    match command {
        WsCommand::Subscribe { topics } => {
            let rejected = subs.subscribe(&topics);
            Ok(serde_json::json!({
                "subscribed": subs.topics(),
                "wildcard": subs.is_subscribed_all(),
                "rejected": rejected,
            }))
        }
        WsCommand::Unsubscribe { topics } => {
            subs.unsubscribe(&topics);
            Ok(serde_json::json!({
                "unsubscribed": topics,
                "remaining": subs.topics(),
                "wildcard": subs.is_subscribed_all(),
            }))
        }
        WsCommand::Like { listing_id } => decide(service, Direction::Like, listing_id).await,
        WsCommand::Dislike { listing_id } => decide(service, Direction::Dislike, listing_id).await,
        WsCommand::Undo => {
            let restored = service.undo().await;
            let current = service.current().await.ok();
            to_payload(&UndoResponse { restored, current })
        }
    }
}

async fn decide(
    service: &SessionService,
    direction: Direction,
    listing_id: Option<ListingId>,
) -> Result<serde_json::Value, SwipeError> {
    let decision = service.swipe(direction, listing_id.as_ref()).await?;
    to_payload(&DecisionResponse::new(decision, service.view().await))
}

fn to_payload<T: Serialize>(value: &T) -> Result<serde_json::Value, SwipeError> {
    serde_json::to_value(value).map_err(|e| SwipeError::Internal(e.to_string()))
}
