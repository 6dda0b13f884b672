//! RUSH domain records.
//!
//! Plain serde records identified by opaque string ids. All mutation goes
//! through [`AppState`](crate::AppState); these types carry no behavior
//! beyond small helpers.

pub mod campus;
pub mod engagement;
pub mod feed;
pub mod notification;
pub mod popup;
pub mod user;

pub use campus::{Campus, GeoPoint};
pub use engagement::{NewReport, NewReview, Report, Review, Rsvp, RsvpStatus};
pub use feed::{NewPost, NewRumor, Post, Rumor};
pub use notification::{Notification, NotificationKind};
pub use popup::{MenuItem, NewPopup, Popup, PopupStatus};
pub use user::{Creator, ProfilePatch, Role, User};

/// Generate a fresh collection-unique id such as `popup-3f2a...`.
pub(crate) fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}
