//! Places Service with Google Geocoding API Integration
//!
//! Optional enrichment that attaches coordinates to scheduled activities so a
//! map can pin them. Generation never depends on it: when no API key is set
//! the service is simply not constructed, and individual lookup failures leave
//! the item without coordinates.
//!
//! ## Setup
//! 1. Enable the Geocoding API in Google Cloud Console
//! 2. Set the environment variable: `GOOGLE_MAPS_API_KEY=your_api_key_here`
//!
//! ## Cost Optimization
//! - Each distinct location text is resolved once per itinerary
//! - Lookups for one itinerary run concurrently

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::models::activity::Coordinates;
use crate::services::day_distribution_service::DaySchedule;

const GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const LOOKUP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("geocoding failed with status {0}")]
    Status(String),
}

#[async_trait]
pub trait PlacesLookup: Send + Sync {
    /// `Ok(None)` when the location text could not be resolved.
    async fn lookup(&self, location: &str) -> Result<Option<Coordinates>, PlacesError>;
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: GeocodeGeometry,
}

#[derive(Debug, Deserialize)]
struct GeocodeGeometry {
    location: GeocodeLocation,
}

#[derive(Debug, Deserialize)]
struct GeocodeLocation {
    lat: f64,
    lng: f64,
}

pub struct GeocodingService {
    http_client: reqwest::Client,
    api_key: String,
}

impl GeocodingService {
    pub fn new(api_key: String) -> Result<Self, PlacesError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(LOOKUP_TIMEOUT_SECS))
            .build()?;

        Ok(Self { http_client, api_key })
    }
}

#[async_trait]
impl PlacesLookup for GeocodingService {
    async fn lookup(&self, location: &str) -> Result<Option<Coordinates>, PlacesError> {
        let response: GeocodeResponse = self
            .http_client
            .get(GEOCODE_ENDPOINT)
            .query(&[("address", location), ("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match response.status.as_str() {
            "OK" => Ok(response.results.first().map(|r| Coordinates {
                lat: r.geometry.location.lat,
                lng: r.geometry.location.lng,
            })),
            "ZERO_RESULTS" => Ok(None),
            other => Err(PlacesError::Status(other.to_string())),
        }
    }
}

/// Attach coordinates to every scheduled item whose location resolves.
///
/// Each distinct location text is looked up once; failures are logged and skipped.
pub async fn enrich_with_coordinates(schedule: &mut DaySchedule, lookup: Arc<dyn PlacesLookup>) {
    let locations: HashSet<String> = schedule
        .values()
        .flatten()
        .map(|item| item.activity().location.clone())
        .filter(|location| !location.trim().is_empty())
        .collect();

    let lookups = locations.into_iter().map(|location| {
        let lookup = lookup.clone();
        async move {
            let result = lookup.lookup(&location).await;
            (location, result)
        }
    });

    let mut resolved: HashMap<String, Coordinates> = HashMap::new();
    for (location, result) in join_all(lookups).await {
        match result {
            Ok(Some(coordinates)) => {
                resolved.insert(location, coordinates);
            }
            Ok(None) => debug!("No coordinates found for '{}'", location),
            Err(e) => warn!("Places lookup failed for '{}': {}", location, e),
        }
    }

    for item in schedule.values_mut().flatten() {
        if let Some(coordinates) = resolved.get(&item.activity().location) {
            item.set_coordinates(*coordinates);
        }
    }
}
