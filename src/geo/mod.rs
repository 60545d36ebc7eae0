//! Client geocoding facade
//!
//! Normalizes gateway responses into [`PlaceSuggestion`]s and [`LocatedPlace`]s.
//! Facades never fail: network or parse problems come back as an empty list
//! or `None`, and callers decide what to fall back to.

pub mod http;
pub mod local;
pub mod normalize;

use crate::directory::{PopularCity, PopularLocality};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A normalized search result
///
/// `city` is never empty: when no city can be parsed it repeats `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSuggestion {
    pub id: String,
    pub name: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LatLng>,
}

impl From<&PopularLocality> for PlaceSuggestion {
    fn from(locality: &PopularLocality) -> Self {
        Self {
            id: locality.id.to_string(),
            name: locality.name.to_string(),
            city: locality.city.to_string(),
            state: Some(locality.state.to_string()),
            country: None,
            full_address: Some(locality.full_address.to_string()),
            location: None,
        }
    }
}

impl From<&PopularCity> for PlaceSuggestion {
    fn from(city: &PopularCity) -> Self {
        Self {
            id: city.id.to_string(),
            name: city.name.to_string(),
            city: city.name.to_string(),
            state: None,
            country: None,
            full_address: None,
            location: None,
        }
    }
}

/// A place resolved from an IP or coordinate lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatedPlace {
    pub city: String,
    pub state: String,
    pub location: Option<LatLng>,
    pub formatted_address: Option<String>,
}

/// Access to the geocoding gateway
pub trait GeocodingFacade: Send + Sync {
    /// Free-text place search
    fn search_text(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Vec<PlaceSuggestion>> + Send;

    /// Type-ahead predictions
    fn autocomplete(
        &self,
        input: &str,
        limit: usize,
    ) -> impl Future<Output = Vec<PlaceSuggestion>> + Send;

    /// The caller's place by IP, or `None` when no genuine answer exists
    fn ip_locate(&self) -> impl Future<Output = Option<LocatedPlace>> + Send;

    /// The place at a coordinate, or `None` when no genuine answer exists
    fn reverse_geocode(
        &self,
        lat: f64,
        lng: f64,
    ) -> impl Future<Output = Option<LocatedPlace>> + Send;
}
