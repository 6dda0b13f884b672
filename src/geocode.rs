//! Address search for re-centering the map.
//!
//! A plain-text query goes to a Nominatim-style search endpoint; the first
//! match is returned. Failures carry a user-facing message and never touch
//! store state. There is no retry.

use serde::Deserialize;

use crate::config::GeocoderConfig;
use crate::domain::GeoPoint;

/// A search hit suitable for dropping a map marker.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoMatch {
    pub label: String,
    pub point: GeoPoint,
}

/// Raw Nominatim result. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    display_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("empty address query")]
    EmptyQuery,
    #[error("geocoder request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("geocoder returned HTTP {0}")]
    Status(u16),
    #[error("malformed geocoder response: {0}")]
    Malformed(String),
    #[error("no match for {0:?}")]
    NoMatch(String),
}

impl GeocodeError {
    /// Message to show next to the search box.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyQuery => "Enter an address to search.".to_string(),
            Self::Request(_) | Self::Status(_) | Self::Malformed(_) => {
                "Address search is unavailable right now.".to_string()
            }
            Self::NoMatch(query) => format!("No results found for \"{query}\"."),
        }
    }
}

/// Address search client.
#[derive(Debug, Clone)]
pub struct Geocoder {
    http: reqwest::Client,
    endpoint: String,
}

impl Geocoder {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Request`] if the HTTP client cannot be built.
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Look up `query` and return the first match.
    pub async fn search(&self, query: &str) -> Result<GeoMatch, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "geocoder request failed"))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "geocoder returned error status");
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let found = first_match(query, &body)?;
        tracing::debug!(label = %found.label, "geocoder match");
        Ok(found)
    }
}

/// Parse a Nominatim response body and take the first result.
fn first_match(query: &str, body: &str) -> Result<GeoMatch, GeocodeError> {
    let places: Vec<Place> =
        serde_json::from_str(body).map_err(|e| GeocodeError::Malformed(e.to_string()))?;
    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NoMatch(query.to_string()))?;

    let coord = |raw: &str, name: &str| {
        raw.parse::<f64>()
            .map_err(|_| GeocodeError::Malformed(format!("{name} {raw:?} is not a number")))
    };
    Ok(GeoMatch {
        point: GeoPoint {
            lat: coord(&place.lat, "lat")?,
            lng: coord(&place.lon, "lon")?,
        },
        label: place.display_name,
    })
}
