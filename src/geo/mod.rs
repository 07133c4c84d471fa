//! Geocoding module
//!
//! Defines the geocoder capability (forward, suggest, reverse) and the
//! normalized result records every provider produces.

pub mod addok;
pub mod transport;

use crate::config::Config;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Attribute set carried by a provider feature
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

/// A rectangular area given by its south-west and north-east corners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// A zero-sized box around a single point
    pub fn from_point(point: LatLng) -> Self {
        Self::new(point, point)
    }

    /// Whether both corners coincide
    pub fn is_point(&self) -> bool {
        self.south_west == self.north_east
    }
}

/// A single geocoding candidate, normalized across providers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingResult {
    /// Display name
    pub name: String,
    /// Center point of the candidate
    pub center: LatLng,
    /// Extent of the candidate (degenerate when the provider gives none)
    pub bbox: LatLngBounds,
    /// Rendered label, present when a label renderer is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Provider attributes, with the classification already localized
    #[serde(default)]
    pub properties: Properties,
}

impl GeocodingResult {
    /// The (localized) classification of this result, if any
    pub fn kind(&self) -> Option<&str> {
        self.properties.get("type").and_then(|v| v.as_str())
    }
}

/// Geocoder capability implemented by every provider adapter
pub trait Geocoder: Send + Sync {
    /// Provider name (e.g., "addok")
    fn name(&self) -> &'static str;

    /// Forward geocode a free-text query
    ///
    /// Results keep the provider's ordering.
    fn geocode(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<GeocodingResult>>> + Send;

    /// Autocomplete suggestions for a partial query
    ///
    /// Same contract as [`Geocoder::geocode`].
    fn suggest(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<GeocodingResult>>> + Send {
        self.geocode(query)
    }

    /// Reverse geocode a location
    ///
    /// `scale` is the map scale at the time of the query. Providers that
    /// cannot use it ignore it.
    fn reverse(
        &self,
        location: LatLng,
        scale: f64,
    ) -> impl Future<Output = Result<Vec<GeocodingResult>>> + Send;
}

/// Build the Addok geocoder described by the configuration
pub fn get_geocoder(config: &Config) -> Result<addok::AddokGeocoder> {
    addok::AddokGeocoder::new(config.addok_options())
}
