//! Presented screen of the session.
//!
//! Four mutually exclusive screens; navigation is a direct set with no
//! guards and no history beyond the current screen.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Screen currently presented to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Card stack with the current listing.
    #[default]
    Home,
    /// Grid of liked listings with category and search filters.
    Liked,
    /// Map of the (category-filtered) liked listings.
    Map,
    /// Conversations with the agents of liked listings.
    Chat,
}

impl Screen {
    /// All screens in bottom-bar order.
    pub const ALL: [Self; 4] = [Self::Home, Self::Liked, Self::Map, Self::Chat];

    /// Returns the screen name as a static string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Liked => "liked",
            Self::Map => "map",
            Self::Chat => "chat",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown screen name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown screen: {0}")]
pub struct UnknownScreen(pub String);

impl FromStr for Screen {
    type Err = UnknownScreen;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|screen| screen.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownScreen(s.to_string()))
    }
}
