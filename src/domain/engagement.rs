//! RSVPs, reviews, and reports attached to popups.

use serde::{Deserialize, Serialize};

/// How committed a user is to a popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    Going,
    Interested,
}

/// A user's RSVP. At most one exists per `(user_id, popup_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rsvp {
    pub id: String,
    pub user_id: String,
    pub popup_id: String,
    pub status: RsvpStatus,
    #[serde(default)]
    pub reminder: bool,
}

/// A star rating left on a popup. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub popup_id: String,
    pub user_id: String,
    /// 1 through 5.
    pub rating: u8,
    #[serde(default)]
    pub text: String,
}

/// Review form payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    pub popup_id: String,
    pub rating: u8,
    #[serde(default)]
    pub text: String,
}

/// A moderation report filed against a popup. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub popup_id: String,
    pub user_id: String,
    /// Reason code chosen in the report sheet, e.g. `"spam"`.
    pub reason: String,
}

/// Report form payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReport {
    pub popup_id: String,
    pub reason: String,
}
