//! Photo posts and rumors. Both feeds are append-only and kept newest-first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub user_id: String,
    /// Image URI from the device picker.
    pub image: String,
    #[serde(default)]
    pub caption: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub image: String,
    #[serde(default)]
    pub caption: String,
}

/// An unconfirmed tip that food is showing up somewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rumor {
    pub id: String,
    pub user_id: String,
    pub content: String,
    /// Free-form tag such as `"tonight"` or `"this week"`.
    pub timeframe: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRumor {
    pub content: String,
    pub timeframe: String,
}
