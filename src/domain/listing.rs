//! Listing records as published by the feed.
//!
//! A [`Listing`] is an immutable snapshot of one property. Any change in the
//! backing store produces a new value carrying the same [`ListingId`].

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stable identifier of a listing, assigned by the feed (the record key).
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct ListingId(String);

impl ListingId {
    /// Creates a `ListingId` from any string-like key.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty id the feed uses for unkeyed records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListingId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ListingId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One real-estate property shown to the user.
///
/// Field names follow the feed's camelCase records. Every field defaults
/// when absent so partially filled records still decode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct Listing {
    /// Record key in the feed.
    pub id: ListingId,
    /// Headline shown on the card.
    pub title: String,
    /// Asking price in whole currency units.
    pub price: i64,
    /// Street address.
    pub address: String,
    /// Number of bedrooms.
    pub bedrooms: u32,
    /// Number of bathrooms.
    pub bathrooms: u32,
    /// Living area in square metres.
    pub square_footage: u32,
    /// Garden area in square metres.
    pub garden_size: u32,
    /// Free-text category (e.g. `"Huis"`, `"Appartement"`).
    pub property_type: String,
    /// Long description.
    pub description: String,
    /// Image URLs in display order.
    pub image_urls: Vec<String>,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
    /// Feature tags (e.g. `"Garage"`).
    pub features: Vec<String>,
    /// Listing agent identifier.
    pub agent_id: String,
    /// Listing agent display name.
    pub agent_name: String,
    /// Listing agent phone number.
    pub agent_phone: String,
    /// Listing agent e-mail address.
    pub agent_email: String,
    /// Construction year.
    pub year_built: u32,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
    /// Feed-side liked flag.
    pub is_liked: bool,
    /// Feed-side swiped flag; swiped listings never enter the queue.
    pub is_swiped: bool,
}

impl Listing {
    /// Returns a copy of this listing re-keyed with `id`.
    #[must_use]
    pub fn with_id(mut self, id: ListingId) -> Self {
        self.id = id;
        self
    }

    /// Returns `true` if the property type equals `category`, ignoring case.
    #[must_use]
    pub fn is_category(&self, category: &str) -> bool {
        self.property_type.to_lowercase() == category.to_lowercase()
    }

    /// Returns `true` if title, address, description or property type
    /// contains `needle`. `needle` must already be lowercased.
    #[must_use]
    pub fn contains_text(&self, needle: &str) -> bool {
        [
            &self.title,
            &self.address,
            &self.description,
            &self.property_type,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }

    /// Returns `false` when either coordinate is `0.0`. The feed writes
    /// zeros for listings that were never geocoded, so a listing on the
    /// equator or the prime meridian is treated as unplaced too.
    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        self.latitude != 0.0 && self.longitude != 0.0
    }

    /// Formats the price as `€ 1.250.000`.
    #[must_use]
    pub fn price_label(&self) -> String {
        let digits = self.price.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        let sign = if self.price < 0 { "-" } else { "" };
        format!("€ {sign}{grouped}")
    }
}
