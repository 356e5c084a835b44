//! Forward and reverse geocoding against a Nominatim-style service.
//!
//! Lookups fail soft: any transport or parse failure is logged and converted
//! into an empty suggestion list or a missing address. Callers never see a
//! raw transport error from this module.

use std::time::Duration;

use reqwest::{blocking::Client, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::geo::Coordinate;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_USER_AGENT: &str =
    "fare-compare/0.1 (ride price comparison client; ops@fare-compare.dev)";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
/// Results requested from the service before local ranking.
const SEARCH_LIMIT: &str = "10";

/// Queries shorter than this never reach the network.
pub const MIN_QUERY_LEN: usize = 3;

/// Suggestion lists are truncated to this many entries after ranking.
pub const MAX_SUGGESTIONS: usize = 5;

/// Endpoint and identification settings for the geocoding client.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub user_agent: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl GeocoderConfig {
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }
}

/// One forward-geocoding hit offered to the user. Ephemeral: discarded as
/// soon as a selection fixes the coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationCandidate {
    pub id: String,
    pub display_name: String,
    pub coordinate: Coordinate,
    pub is_local_match: bool,
}

/// Errors swallowed (and logged) inside this module.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("invalid endpoint url: {0}")]
    Endpoint(String),
    #[error("transport: {0}")]
    Http(reqwest::Error),
    #[error("endpoint returned status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Json(reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct GeocodePlace {
    display_name: String,
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct ReverseGeocodeResponse {
    display_name: Option<String>,
}

/// Blocking geocoding client. Holds no state between calls.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Client,
    endpoint: String,
}

impl GeocodingClient {
    pub fn new(config: GeocoderConfig) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(config.user_agent)
            .build()
            .expect("failed to build geocoding client");
        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// Forward-geocode a free-text query, biased towards `bias_city`.
    ///
    /// Returns at most [`MAX_SUGGESTIONS`] candidates with local matches
    /// first. Queries below [`MIN_QUERY_LEN`] characters and any failed
    /// lookup yield an empty list.
    pub fn suggest(&self, query: &str, bias_city: &str) -> Vec<LocationCandidate> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }
        match self.search(query, bias_city) {
            Ok(places) => rank_candidates(places, bias_city),
            Err(error) => {
                warn!(%error, query, "location search failed, returning no suggestions");
                Vec::new()
            }
        }
    }

    /// Reverse-geocode a coordinate into a display address. `None` on any
    /// failure; callers substitute their own fallback label.
    pub fn resolve_address(&self, coordinate: Coordinate) -> Option<String> {
        match self.reverse(coordinate) {
            Ok(Some(name)) if !name.trim().is_empty() => Some(name),
            Ok(_) => None,
            Err(error) => {
                warn!(%error, "reverse geocoding failed");
                None
            }
        }
    }

    fn search(&self, query: &str, bias_city: &str) -> Result<Vec<GeocodePlace>, GeocodeError> {
        let mut url = Url::parse(&format!("{}/search", self.endpoint))
            .map_err(|err| GeocodeError::Endpoint(err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", &format!("{query} {bias_city}"))
            .append_pair("limit", SEARCH_LIMIT);

        let response = self
            .client
            .get(url)
            .header("Accept-Language", ACCEPT_LANGUAGE)
            .send()
            .map_err(GeocodeError::Http)?;
        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }
        response.json().map_err(GeocodeError::Json)
    }

    fn reverse(&self, coordinate: Coordinate) -> Result<Option<String>, GeocodeError> {
        let mut url = Url::parse(&format!("{}/reverse", self.endpoint))
            .map_err(|err| GeocodeError::Endpoint(err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("lat", &coordinate.latitude().to_string())
            .append_pair("lon", &coordinate.longitude().to_string());

        let response = self
            .client
            .get(url)
            .header("Accept-Language", ACCEPT_LANGUAGE)
            .send()
            .map_err(GeocodeError::Http)?;
        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }
        let parsed: ReverseGeocodeResponse = response.json().map_err(GeocodeError::Json)?;
        Ok(parsed.display_name)
    }
}

/// Map raw places to candidates: local matches first (stable order within
/// each group), truncated to [`MAX_SUGGESTIONS`]. Places with unparseable or
/// out-of-range coordinates are dropped.
fn rank_candidates(places: Vec<GeocodePlace>, bias_city: &str) -> Vec<LocationCandidate> {
    let mut candidates: Vec<LocationCandidate> = places
        .into_iter()
        .enumerate()
        .filter_map(|(idx, place)| {
            let lat = place.lat.parse::<f64>().ok()?;
            let lon = place.lon.parse::<f64>().ok()?;
            let coordinate = Coordinate::new(lat, lon).ok()?;
            let is_local_match = place.display_name.contains(bias_city);
            Some(LocationCandidate {
                id: idx.to_string(),
                display_name: place.display_name,
                coordinate,
                is_local_match,
            })
        })
        .collect();
    candidates.sort_by_key(|candidate| !candidate.is_local_match);
    candidates.truncate(MAX_SUGGESTIONS);
    candidates
}
