//! Category and free-text derivations over the liked set.

use super::Listing;

/// Sentinel category selected by default; shows every liked listing.
pub const ALL_CATEGORIES: &str = "Alles";

/// Category chips offered on the liked screen.
pub const CATEGORIES: [&str; 4] = [ALL_CATEGORIES, "Huis", "Appartement", "Studio"];

/// Returns `true` if `category` is the no-filter sentinel (`"all"` or
/// `"alles"`, any case).
#[must_use]
pub fn is_all(category: &str) -> bool {
    let category = category.trim();
    category.eq_ignore_ascii_case("all") || category.eq_ignore_ascii_case(ALL_CATEGORIES)
}

/// Restricts `listings` to those whose property type equals `category`,
/// ignoring case. The sentinel returns everything.
#[must_use]
pub fn by_category(listings: &[Listing], category: &str) -> Vec<Listing> {
    if is_all(category) {
        return listings.to_vec();
    }
    listings
        .iter()
        .filter(|listing| listing.is_category(category))
        .cloned()
        .collect()
}

/// Restricts `listings` to those mentioning `query` in title, address,
/// description or property type. A blank query returns everything.
#[must_use]
pub fn by_query(listings: &[Listing], query: &str) -> Vec<Listing> {
    if query.trim().is_empty() {
        return listings.to_vec();
    }
    let needle = query.to_lowercase();
    listings
        .iter()
        .filter(|listing| listing.contains_text(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ListingId;

    fn listing(id: &str, title: &str, property_type: &str) -> Listing {
        Listing {
            id: ListingId::new(id),
            title: title.to_string(),
            property_type: property_type.to_string(),
            ..Listing::default()
        }
    }

    fn ids(listings: &[Listing]) -> Vec<&str> {
        listings.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn sentinel_variants() {
        assert!(is_all("Alles"));
        assert!(is_all("ALLES"));
        assert!(is_all("all"));
        assert!(is_all("All"));
        assert!(!is_all("Huis"));
        assert!(!is_all(""));
    }

    #[test]
    fn category_filter_keeps_matching_types() {
        let liked = vec![
            listing("1", "Loft A", "Appartement"),
            listing("2", "Villa B", "Huis"),
            listing("3", "Kot C", "studio"),
        ];
        assert_eq!(ids(&by_category(&liked, "Alles")), ["1", "2", "3"]);
        assert_eq!(ids(&by_category(&liked, "huis")), ["2"]);
        assert_eq!(ids(&by_category(&liked, "Studio")), ["3"]);
        assert!(by_category(&liked, "Penthouse").is_empty());
    }

    #[test]
    fn query_filter_is_substring_and_case_insensitive() {
        let liked = vec![listing("1", "Loft A", "Appartement")];
        assert_eq!(ids(&by_query(&liked, "loft")), ["1"]);
        assert_eq!(ids(&by_query(&liked, "LOFT")), ["1"]);
        assert!(by_query(&liked, "villa").is_empty());
        assert_eq!(ids(&by_query(&liked, "   ")), ["1"]);
        assert_eq!(ids(&by_query(&liked, "")), ["1"]);
    }
}
