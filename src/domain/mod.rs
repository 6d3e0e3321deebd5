//! Domain layer: listings, the swipe session state machine, navigation,
//! derived projections, and the event system.

pub mod chat;
pub mod decision;
pub mod event_bus;
pub mod filter;
pub mod listing;
pub mod map;
pub mod navigation;
pub mod session;
pub mod session_event;
pub mod user_id;

pub use decision::{Decision, Direction};
pub use event_bus::EventBus;
pub use listing::{Listing, ListingId};
pub use navigation::Screen;
pub use session::{SessionView, SwipeSession};
pub use session_event::{FeedKind, SessionEvent, Topic};
pub use user_id::UserId;
