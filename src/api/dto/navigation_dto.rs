//! Navigation DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Screen;

/// Body of `PUT /navigation` and response of both navigation endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NavigationDto {
    /// Presented screen.
    pub screen: Screen,
}
