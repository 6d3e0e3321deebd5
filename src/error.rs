//! Error types for the feed adapters and the session service.
//!
//! [`FeedError`] describes failures of the remote listing feed.
//! [`SwipeError`] is the central error type of the service and the HTTP
//! layer; each variant maps to a numeric code, an HTTP status code, and a
//! structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ListingId;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "no listing left in the queue",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Failure of the remote listing feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Transport-level HTTP failure.
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed answered with a non-success status.
    #[error("feed returned {status} for {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL without credentials.
        url: String,
    },

    /// A record or event payload could not be decoded.
    #[error("invalid feed payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The live stream broke or ended.
    #[error("feed stream interrupted: {0}")]
    Stream(String),

    /// The feed revoked the subscription (permissions, auth).
    #[error("feed subscription cancelled: {0}")]
    Cancelled(String),

    /// Failure injected by an in-memory feed.
    #[error("injected feed failure: {0}")]
    Injected(String),

    /// The feed has shut down.
    #[error("feed closed")]
    Closed,
}

/// Service-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                   |
/// |-----------|-----------------|-------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request               |
/// | 2000–2999 | State/Not Found | 404 Not Found / 409 Conflict  |
/// | 3000–3999 | Server          | 500 / 502                     |
#[derive(Debug, thiserror::Error)]
pub enum SwipeError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A decision was requested but no card is presented.
    #[error("no listing left in the queue")]
    QueueEmpty,

    /// The listing is not in the liked set.
    #[error("listing not in liked set: {0}")]
    LikedListingNotFound(ListingId),

    /// Error propagated from the feed adapter.
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SwipeError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::QueueEmpty => 2001,
            Self::LikedListingNotFound(_) => 2002,
            Self::Internal(_) => 3000,
            Self::Feed(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::QueueEmpty => StatusCode::CONFLICT,
            Self::LikedListingNotFound(_) => StatusCode::NOT_FOUND,
            Self::Feed(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SwipeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
