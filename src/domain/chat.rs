//! Chat threads: one conversation stub per liked listing.

use serde::Serialize;
use utoipa::ToSchema;

use super::{Listing, ListingId};

/// A conversation with the agent of a liked listing.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChatThread {
    /// Listing the conversation is about.
    pub listing_id: ListingId,
    /// Listing title shown as the thread name.
    pub title: String,
    /// First image of the listing, used as the avatar.
    pub thumbnail_url: Option<String>,
    /// Agent display name.
    pub agent_name: String,
    /// Agent phone number.
    pub agent_phone: String,
    /// Agent e-mail address.
    pub agent_email: String,
}

impl From<&Listing> for ChatThread {
    fn from(listing: &Listing) -> Self {
        Self {
            listing_id: listing.id.clone(),
            title: listing.title.clone(),
            thumbnail_url: listing.image_urls.first().cloned(),
            agent_name: listing.agent_name.clone(),
            agent_phone: listing.agent_phone.clone(),
            agent_email: listing.agent_email.clone(),
        }
    }
}

/// Builds the thread list for the liked set, keeping its order.
#[must_use]
pub fn threads(liked: &[Listing]) -> Vec<ChatThread> {
    liked.iter().map(ChatThread::from).collect()
}
