//! System endpoints: health check, category catalog.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::filter::{ALL_CATEGORIES, CATEGORIES};

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Category chip shown above the liked grid.
#[derive(Debug, Serialize, ToSchema)]
struct CategoryInfo {
    name: &'static str,
    selects_all: bool,
}

/// `GET /config/categories` — List the liked-set categories.
#[utoipa::path(
    get,
    path = "/config/categories",
    tag = "System",
    summary = "List categories",
    description = "Returns the category chips of the liked grid. The first one selects every listing.",
    responses(
        (status = 200, description = "Category catalog", body = Vec<CategoryInfo>),
    )
)]
pub async fn categories_handler() -> impl IntoResponse {
    let categories: Vec<CategoryInfo> = CATEGORIES
        .iter()
        .map(|&name| CategoryInfo {
            name,
            selects_all: name == ALL_CATEGORIES,
        })
        .collect();
    (StatusCode::OK, Json(categories))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/categories", get(categories_handler))
}
