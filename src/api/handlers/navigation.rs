//! Navigation handlers: presented screen.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::NavigationDto;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, SwipeError};

/// `GET /navigation` — Screen currently presented.
///
/// # Errors
///
/// Infallible in practice; the signature matches the other handlers.
#[utoipa::path(
    get,
    path = "/api/v1/navigation",
    tag = "Navigation",
    summary = "Get current screen",
    description = "Returns the screen selected in the bottom navigation.",
    responses(
        (status = 200, description = "Current screen", body = NavigationDto),
    )
)]
pub async fn get_navigation(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, SwipeError> {
    let screen = state.session_service.current_screen().await;
    Ok((StatusCode::OK, Json(NavigationDto { screen })))
}

/// `PUT /navigation` — Present another screen.
///
/// # Errors
///
/// Unknown screen names are rejected by the JSON extractor.
#[utoipa::path(
    put,
    path = "/api/v1/navigation",
    tag = "Navigation",
    summary = "Navigate",
    description = "Switches between the home, liked, map, and chat screens.",
    request_body = NavigationDto,
    responses(
        (status = 200, description = "Screen presented", body = NavigationDto),
        (status = 422, description = "Unknown screen", body = ErrorResponse),
    )
)]
pub async fn put_navigation(
    State(state): State<AppState>,
    Json(req): Json<NavigationDto>,
) -> Result<impl IntoResponse, SwipeError> {
    let screen = state.session_service.navigate(req.screen).await;
    Ok((StatusCode::OK, Json(NavigationDto { screen })))
}

/// Navigation routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/navigation", get(get_navigation).put(put_navigation))
}
