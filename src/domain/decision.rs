//! Swipe decisions and their direction.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

use super::Listing;

/// Direction of a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Swipe right.
    Like,
    /// Swipe left.
    Dislike,
}

impl Direction {
    /// Returns `+1` for [`Direction::Like`] and `-1` for [`Direction::Dislike`].
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Self::Like => 1,
            Self::Dislike => -1,
        }
    }

    /// Returns the direction as a static string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A like or dislike applied to one listing.
///
/// Only the most recent decision is retained, for a single-level undo.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Decision {
    /// The listing the decision was taken on, as it was shown.
    pub listing: Listing,
    /// Like or dislike.
    pub direction: Direction,
}

impl Decision {
    /// Creates a new decision.
    #[must_use]
    pub fn new(listing: Listing, direction: Direction) -> Self {
        Self { listing, direction }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_matches_direction() {
        assert_eq!(Direction::Like.sign(), 1);
        assert_eq!(Direction::Dislike.sign(), -1);
    }

    #[test]
    fn direction_serializes_snake_case() {
        let json = serde_json::to_string(&Direction::Dislike).unwrap_or_default();
        assert_eq!(json, "\"dislike\"");
    }
}
