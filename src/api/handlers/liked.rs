//! Liked-set handlers: list, remove, filter, search, map, chats.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, put};
use axum::{Json, Router};

use crate::api::dto::{
    CategoryFilterRequest, ChatListResponse, FiltersResponse, LikedListResponse, PaginationParams,
    SearchRequest,
};
use crate::app_state::AppState;
use crate::domain::ListingId;
use crate::error::{ErrorResponse, SwipeError};
use crate::service::MapView;

/// `GET /liked` — Liked listings matching the selected category and query.
///
/// # Errors
///
/// Infallible in practice; the signature matches the other handlers.
#[utoipa::path(
    get,
    path = "/api/v1/liked",
    tag = "Liked",
    summary = "List liked listings",
    description = "Returns a paginated page of liked listings after the category filter and the search query.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated liked listings", body = LikedListResponse),
    )
)]
pub async fn list_liked(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, SwipeError> {
    let service = &state.session_service;
    let view = service.view().await;
    let (data, pagination) = params.paginate(service.liked().await);

    Ok((
        StatusCode::OK,
        Json(LikedListResponse {
            data,
            category: view.category_filter,
            query: view.search_query,
            pagination,
        }),
    ))
}

/// `DELETE /liked/{id}` — Remove a listing from the liked set.
///
/// The dislike is sent to the feed without waiting; the listing leaves
/// the set once the feed publishes the change.
///
/// # Errors
///
/// Returns [`SwipeError::LikedListingNotFound`] for an unknown listing.
#[utoipa::path(
    delete,
    path = "/api/v1/liked/{id}",
    tag = "Liked",
    summary = "Remove from liked",
    description = "Sends a dislike for a liked listing. The liked set updates when the feed confirms.",
    params(("id" = String, Path, description = "Listing identifier")),
    responses(
        (status = 202, description = "Removal sent"),
        (status = 404, description = "Listing not in liked set", body = ErrorResponse),
    )
)]
pub async fn remove_liked(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, SwipeError> {
    state
        .session_service
        .remove_from_liked(&ListingId::new(id))
        .await?;
    Ok(StatusCode::ACCEPTED)
}

/// `PUT /liked/filter` — Select the liked-set category.
///
/// # Errors
///
/// Returns [`SwipeError::InvalidRequest`] for a blank category.
#[utoipa::path(
    put,
    path = "/api/v1/liked/filter",
    tag = "Liked",
    summary = "Set category filter",
    description = "Selects the category shown in the liked grid and on the map. `Alles` shows every listing.",
    request_body = CategoryFilterRequest,
    responses(
        (status = 200, description = "Filter applied", body = FiltersResponse),
        (status = 400, description = "Blank category", body = ErrorResponse),
    )
)]
pub async fn set_filter(
    State(state): State<AppState>,
    Json(req): Json<CategoryFilterRequest>,
) -> Result<impl IntoResponse, SwipeError> {
    let category = req.category.trim();
    if category.is_empty() {
        return Err(SwipeError::InvalidRequest(
            "category must not be blank".to_string(),
        ));
    }
    let matching = state.session_service.set_category_filter(category).await;
    Ok((StatusCode::OK, Json(filters_response(&state, matching.len()).await)))
}

/// `PUT /liked/search` — Set the liked-set search query.
///
/// # Errors
///
/// Infallible in practice; a blank query clears the search.
#[utoipa::path(
    put,
    path = "/api/v1/liked/search",
    tag = "Liked",
    summary = "Set search query",
    description = "Case-insensitive substring search over title, address, description, and property type.",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Search applied", body = FiltersResponse),
    )
)]
pub async fn set_search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<impl IntoResponse, SwipeError> {
    let matching = state.session_service.set_search_query(&req.query).await;
    Ok((StatusCode::OK, Json(filters_response(&state, matching.len()).await)))
}

/// `GET /liked/map` — Map markers for the liked listings.
///
/// # Errors
///
/// Infallible in practice; the signature matches the other handlers.
#[utoipa::path(
    get,
    path = "/api/v1/liked/map",
    tag = "Liked",
    summary = "Liked listings map",
    description = "Markers for category-filtered liked listings with coordinates, their bounds, and the default center.",
    responses(
        (status = 200, description = "Map view", body = MapView),
    )
)]
pub async fn get_map(State(state): State<AppState>) -> Result<impl IntoResponse, SwipeError> {
    Ok((StatusCode::OK, Json(state.session_service.map().await)))
}

/// `GET /liked/chats` — One chat thread per liked listing.
///
/// # Errors
///
/// Infallible in practice; the signature matches the other handlers.
#[utoipa::path(
    get,
    path = "/api/v1/liked/chats",
    tag = "Liked",
    summary = "Chat threads",
    description = "Agent contact threads for every liked listing.",
    responses(
        (status = 200, description = "Chat threads", body = ChatListResponse),
    )
)]
pub async fn get_chats(State(state): State<AppState>) -> Result<impl IntoResponse, SwipeError> {
    let data = state.session_service.chats().await;
    Ok((StatusCode::OK, Json(ChatListResponse { data })))
}

async fn filters_response(state: &AppState, matching: usize) -> FiltersResponse {
    let view = state.session_service.view().await;
    FiltersResponse {
        category: view.category_filter,
        query: view.search_query,
        matching,
    }
}

/// Liked-set routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/liked", get(list_liked))
        .route("/liked/{id}", delete(remove_liked))
        .route("/liked/filter", put(set_filter))
        .route("/liked/search", put(set_search))
        .route("/liked/map", get(get_map))
        .route("/liked/chats", get(get_chats))
}
