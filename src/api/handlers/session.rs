//! Swipe-session handlers: view, current card, like, dislike, undo.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{DecisionRequest, DecisionResponse, UndoResponse};
use crate::app_state::AppState;
use crate::domain::{Direction, Listing, SessionView};
use crate::error::{ErrorResponse, SwipeError};

/// `GET /session` — Snapshot of the swipe session.
///
/// # Errors
///
/// Infallible in practice; the signature matches the other handlers.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    tag = "Session",
    summary = "Get session state",
    description = "Returns the current card, the remaining queue, the last decision, and the liked-set filters.",
    responses(
        (status = 200, description = "Session state", body = SessionView),
    )
)]
pub async fn get_session(State(state): State<AppState>) -> Result<impl IntoResponse, SwipeError> {
    Ok((StatusCode::OK, Json(state.session_service.view().await)))
}

/// `GET /session/current` — Card currently presented.
///
/// # Errors
///
/// Returns [`SwipeError::QueueEmpty`] when the queue is empty.
#[utoipa::path(
    get,
    path = "/api/v1/session/current",
    tag = "Session",
    summary = "Get current card",
    description = "Returns the listing at the top of the swipe stack.",
    responses(
        (status = 200, description = "Current listing", body = Listing),
        (status = 409, description = "Queue is empty", body = ErrorResponse),
    )
)]
pub async fn get_current(State(state): State<AppState>) -> Result<impl IntoResponse, SwipeError> {
    let listing = state.session_service.current().await?;
    Ok((StatusCode::OK, Json(listing)))
}

/// `POST /session/like` — Like the current card or a queued listing.
///
/// # Errors
///
/// Returns [`SwipeError::InvalidRequest`] on a malformed body and
/// [`SwipeError::QueueEmpty`] when no card is presented.
#[utoipa::path(
    post,
    path = "/api/v1/session/like",
    tag = "Session",
    summary = "Like a listing",
    description = "Records a like locally and sends it to the feed without waiting. Without a body the current card is liked.",
    request_body(content = DecisionRequest, description = "Optional target listing"),
    responses(
        (status = 200, description = "Decision recorded", body = DecisionResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 409, description = "Queue is empty", body = ErrorResponse),
    )
)]
pub async fn like(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, SwipeError> {
    decide(&state, Direction::Like, &body).await
}

/// `POST /session/dislike` — Dislike the current card or a queued listing.
///
/// # Errors
///
/// Returns [`SwipeError::InvalidRequest`] on a malformed body and
/// [`SwipeError::QueueEmpty`] when no card is presented.
#[utoipa::path(
    post,
    path = "/api/v1/session/dislike",
    tag = "Session",
    summary = "Dislike a listing",
    description = "Records a dislike locally and sends it to the feed without waiting. Without a body the current card is disliked.",
    request_body(content = DecisionRequest, description = "Optional target listing"),
    responses(
        (status = 200, description = "Decision recorded", body = DecisionResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 409, description = "Queue is empty", body = ErrorResponse),
    )
)]
pub async fn dislike(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, SwipeError> {
    decide(&state, Direction::Dislike, &body).await
}

/// `POST /session/undo` — Restore the last decided card.
///
/// # Errors
///
/// Infallible in practice; undo without a prior decision returns `null`.
#[utoipa::path(
    post,
    path = "/api/v1/session/undo",
    tag = "Session",
    summary = "Undo last decision",
    description = "Puts the last decided listing back on top of the stack. The remote like/dislike is not reversed.",
    responses(
        (status = 200, description = "Undo result", body = UndoResponse),
    )
)]
pub async fn undo(State(state): State<AppState>) -> Result<impl IntoResponse, SwipeError> {
    let restored = state.session_service.undo().await;
    let current = state.session_service.current().await.ok();
    Ok((StatusCode::OK, Json(UndoResponse { restored, current })))
}

async fn decide(
    state: &AppState,
    direction: Direction,
    body: &[u8],
) -> Result<Json<DecisionResponse>, SwipeError> {
    let request = parse_decision_request(body)?;
    let service = &state.session_service;

    let decision = service
        .swipe(direction, request.listing_id.as_ref())
        .await?;

    Ok(Json(DecisionResponse::new(decision, service.view().await)))
}

/// An empty body targets the current card.
fn parse_decision_request(body: &[u8]) -> Result<DecisionRequest, SwipeError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(DecisionRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| SwipeError::InvalidRequest(e.to_string()))
}

/// Session routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/session", get(get_session))
        .route("/session/current", get(get_current))
        .route("/session/like", post(like))
        .route("/session/dislike", post(dislike))
        .route("/session/undo", post(undo))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_targets_current_card() {
        let Ok(request) = parse_decision_request(b"  \n") else {
            panic!("blank body should parse");
        };
        assert!(request.listing_id.is_none());
    }

    #[test]
    fn body_names_listing() {
        let Ok(request) = parse_decision_request(br#"{"listing_id":"-Nabc"}"#) else {
            panic!("body should parse");
        };
        assert_eq!(request.listing_id.map(|id| id.to_string()).as_deref(), Some("-Nabc"));
    }

    #[test]
    fn malformed_body_is_invalid_request() {
        let Err(err) = parse_decision_request(b"{not json") else {
            panic!("malformed body should fail");
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
