//! Liked-set DTOs: filtered list, filter updates, chat threads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::Listing;
use crate::domain::chat::ChatThread;

/// Paginated response for `GET /liked`.
#[derive(Debug, Serialize, ToSchema)]
pub struct LikedListResponse {
    /// Liked listings matching category and query.
    pub data: Vec<Listing>,
    /// Selected category.
    pub category: String,
    /// Current search query.
    pub query: String,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Body of `PUT /liked/filter`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryFilterRequest {
    /// Category to show; `"Alles"` shows everything.
    pub category: String,
}

/// Body of `PUT /liked/search`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchRequest {
    /// Free-text query; blank clears the search.
    #[serde(default)]
    pub query: String,
}

/// Response to a filter or search update.
#[derive(Debug, Serialize, ToSchema)]
pub struct FiltersResponse {
    /// Selected category.
    pub category: String,
    /// Current search query.
    pub query: String,
    /// Number of liked listings matching both.
    pub matching: usize,
}

/// Response for `GET /liked/chats`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatListResponse {
    /// One thread per liked listing.
    pub data: Vec<ChatThread>,
}
