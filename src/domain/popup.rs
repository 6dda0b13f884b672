//! Food pop-ups published by creators.
//!
//! Status only moves forward: `Upcoming -> Active -> Past`. The store creates
//! popups as `Upcoming` and moves them to `Past` when attendance is recorded.
//! `Active` only arrives through seed data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::GeoPoint;

/// Lifecycle stage of a popup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopupStatus {
    #[default]
    Upcoming,
    Active,
    Past,
}

impl PopupStatus {
    /// Return the wire label for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Active => "active",
            Self::Past => "past",
        }
    }

    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Past)
    }
}

/// One line on a popup's menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    /// Price in cents.
    pub price: u32,
    #[serde(default)]
    pub description: Option<String>,
}

/// A published popup event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub id: String,
    pub creator_id: String,
    pub campus_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub location_name: String,
    pub location: GeoPoint,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    pub status: PopupStatus,
    #[serde(default)]
    pub attendance: u32,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub menu: Vec<MenuItem>,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    #[serde(default)]
    pub food_type: Option<String>,
}

/// Publish form payload: a popup without id, status, or attendance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPopup {
    pub creator_id: String,
    pub campus_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub location_name: String,
    pub location: GeoPoint,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub menu: Vec<MenuItem>,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    #[serde(default)]
    pub food_type: Option<String>,
}

impl NewPopup {
    /// Materialize the popup as freshly published.
    pub(crate) fn publish(self, id: String) -> Popup {
        Popup {
            id,
            creator_id: self.creator_id,
            campus_id: self.campus_id,
            title: self.title,
            description: self.description,
            location_name: self.location_name,
            location: self.location,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            status: PopupStatus::Upcoming,
            attendance: 0,
            capacity: self.capacity,
            menu: self.menu,
            dietary_tags: self.dietary_tags,
            food_type: self.food_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_order_matches_lifecycle() {
        assert!(PopupStatus::Upcoming < PopupStatus::Active);
        assert!(PopupStatus::Active < PopupStatus::Past);
        assert!(PopupStatus::Past.is_terminal());
        assert!(!PopupStatus::Active.is_terminal());
    }

    #[test]
    fn status_wire_labels() {
        let json = serde_json::to_string(&PopupStatus::Active).unwrap();
        assert_eq!(json, format!("\"{}\"", PopupStatus::Active.as_str()));
    }
}
