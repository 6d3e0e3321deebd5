//! OpenAPI document assembled from the handler annotations.

use utoipa::OpenApi;

use super::handlers::{liked, navigation, session, system};

/// OpenAPI description of the REST surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "house-swipe",
        description = "Swipe through real-estate listings, manage the liked set, and follow session events."
    ),
    paths(
        session::get_session,
        session::get_current,
        session::like,
        session::dislike,
        session::undo,
        liked::list_liked,
        liked::remove_liked,
        liked::set_filter,
        liked::set_search,
        liked::get_map,
        liked::get_chats,
        navigation::get_navigation,
        navigation::put_navigation,
        system::health_handler,
        system::categories_handler,
    ),
    tags(
        (name = "Session", description = "Swipe stack and decisions"),
        (name = "Liked", description = "Liked listings, filters, map, and chats"),
        (name = "Navigation", description = "Presented screen"),
        (name = "System", description = "Health and configuration"),
    )
)]
pub struct ApiDoc;
