//! Campuses -- immutable after seeding.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// A university campus users can affiliate with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campus {
    pub id: String,
    /// Display name, e.g. "Stanford University".
    pub name: String,
    pub city: String,
    pub state: String,
    pub coordinates: GeoPoint,
    pub zip: String,
}
