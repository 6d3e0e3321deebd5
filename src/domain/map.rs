//! Map projection of liked listings: markers and the bounding box the
//! camera should fit.

use serde::Serialize;
use utoipa::ToSchema;

use super::{Listing, ListingId};

/// Camera centre used when there is nothing to show (Brussels).
pub const DEFAULT_CENTER: LatLng = LatLng {
    latitude: 50.8466,
    longitude: 4.3525,
};

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct LatLng {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// One pin on the map.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MapMarker {
    /// Listing the marker belongs to.
    pub listing_id: ListingId,
    /// Marker position.
    pub position: LatLng,
    /// Marker title (the listing title).
    pub title: String,
    /// Marker snippet (the price label).
    pub snippet: String,
}

/// Axis-aligned box around a set of markers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct MapBounds {
    /// South-west corner.
    pub south_west: LatLng,
    /// North-east corner.
    pub north_east: LatLng,
}

/// Builds one marker per listing that has coordinates.
///
/// Listings with a zero latitude or longitude are skipped and logged.
#[must_use]
pub fn markers(listings: &[Listing]) -> Vec<MapMarker> {
    listings
        .iter()
        .filter_map(|listing| {
            if !listing.has_coordinates() {
                tracing::warn!(listing_id = %listing.id, title = %listing.title, "listing has invalid coordinates");
                return None;
            }
            Some(MapMarker {
                listing_id: listing.id.clone(),
                position: LatLng {
                    latitude: listing.latitude,
                    longitude: listing.longitude,
                },
                title: listing.title.clone(),
                snippet: listing.price_label(),
            })
        })
        .collect()
}

/// Returns the box enclosing every marker, or `None` when there are none.
#[must_use]
pub fn bounds(markers: &[MapMarker]) -> Option<MapBounds> {
    let first = markers.first()?.position;
    let init = MapBounds {
        south_west: first,
        north_east: first,
    };
    Some(markers.iter().fold(init, |acc, marker| MapBounds {
        south_west: LatLng {
            latitude: acc.south_west.latitude.min(marker.position.latitude),
            longitude: acc.south_west.longitude.min(marker.position.longitude),
        },
        north_east: LatLng {
            latitude: acc.north_east.latitude.max(marker.position.latitude),
            longitude: acc.north_east.longitude.max(marker.position.longitude),
        },
    }))
}
