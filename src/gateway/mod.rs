//! Geocoding gateway
//!
//! Hides the external places/geocoding vendor behind a stable contract.
//! Operations with a safe static substitute (search, autocomplete, IP locate,
//! reverse geocode) never fail: vendor errors, timeouts and malformed payloads
//! are answered from the fallback directory or the default place, tagged with
//! a `FALLBACK_RESPONSE` status. Operations without one (details, nearby,
//! photo) return the error and let the HTTP layer decide how to degrade.

pub mod fallback;
pub mod types;
pub mod vendor;

use crate::config::Config;
use crate::constants::api::{
    AUTOCOMPLETE_PATH, DETAILS_ADVANCED_PATH, DETAILS_PATH, IP_LOCATE_PATH, NEARBY_PATH,
    PHOTO_PATH, REVERSE_GEOCODE_PATH, TEXT_SEARCH_PATH,
};
use crate::constants::status;
use crate::error::{Error, Result};
use fallback::DefaultPlace;
use std::net::IpAddr;
use std::time::Duration;
use tracing::{info, warn};
use types::{AutocompleteResponse, GeocodeResponse, SearchResponse};
use vendor::{VendorBytes, VendorClient};

/// Timeouts and defaults the gateway applies to vendor calls
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub request_timeout: Duration,
    pub autocomplete_timeout: Duration,
    pub ip_timeout: Duration,
    pub default_place: DefaultPlace,
}

impl GatewaySettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            request_timeout: Duration::from_secs(config.gateway.request_timeout_secs),
            autocomplete_timeout: Duration::from_secs(config.gateway.autocomplete_timeout_secs),
            ip_timeout: Duration::from_secs(config.gateway.ip_timeout_secs),
            default_place: DefaultPlace {
                city: config.location.default_city.clone(),
                state: config.location.default_state.clone(),
                lat: config.location.default_lat,
                lng: config.location.default_lng,
            },
        }
    }
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Nearby search parameters
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius: u32,
    pub kind: Option<String>,
}

/// Photo fetch parameters
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoQuery {
    pub reference: String,
    pub max_width: u32,
    pub max_height: Option<u32>,
}

/// The gateway service
#[derive(Debug, Clone)]
pub struct Gateway {
    vendor: VendorClient,
    settings: GatewaySettings,
}

impl Gateway {
    pub fn new(vendor: VendorClient, settings: GatewaySettings) -> Self {
        Self { vendor, settings }
    }

    /// Build a gateway from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let vendor = VendorClient::new(
            &config.vendor.base_url,
            &config.vendor_api_key(),
            &config.vendor.api_key_header,
        )?;
        Ok(Self::new(vendor, GatewaySettings::from_config(config)))
    }

    pub fn has_api_key(&self) -> bool {
        self.vendor.has_api_key()
    }

    pub fn default_place(&self) -> &DefaultPlace {
        &self.settings.default_place
    }

    /// Forward a text search; falls back to popular city matches
    pub async fn search_text(&self, query: &str, limit: usize) -> SearchResponse {
        let params = [("text", query.to_string()), ("limit", limit.to_string())];
        let result: Result<SearchResponse> = self
            .vendor
            .get_json(TEXT_SEARCH_PATH, &params, self.settings.request_timeout)
            .await;

        match result {
            Ok(mut response) => {
                response.features.truncate(limit);
                response.status = status::OK.to_string();
                response.error_details = None;
                response
            }
            Err(e) => {
                info!(query, error = %e, "Serving text search from fallback directory");
                fallback::search_response(query, limit, &e.summary())
            }
        }
    }

    /// Forward an autocomplete; falls back to locality and city matches
    pub async fn autocomplete(&self, input: &str, limit: usize) -> AutocompleteResponse {
        let params = [("input", input.to_string()), ("limit", limit.to_string())];
        let result: Result<AutocompleteResponse> = self
            .vendor
            .get_json(AUTOCOMPLETE_PATH, &params, self.settings.autocomplete_timeout)
            .await
            .and_then(|response: AutocompleteResponse| {
                if response.is_success() {
                    Ok(response)
                } else {
                    Err(Error::MalformedPayload(format!(
                        "autocomplete status {}",
                        response.status
                    )))
                }
            });

        match result {
            Ok(mut response) => {
                response.predictions.truncate(limit);
                response.error_details = None;
                response
            }
            Err(e) => {
                info!(input, error = %e, "Serving autocomplete from fallback directory");
                fallback::autocomplete_response(input, limit, &e.summary())
            }
        }
    }

    /// Locate the caller from their IP; falls back to the default place
    pub async fn ip_locate(&self, ip: Option<IpAddr>) -> GeocodeResponse {
        let params: Vec<(&str, String)> = ip.map(|ip| ("ip", ip.to_string())).into_iter().collect();
        let result = self
            .geocode(IP_LOCATE_PATH, &params, self.settings.ip_timeout)
            .await;

        match result {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "IP location failed, answering with default place");
                fallback::geocode_response(&self.settings.default_place, &e.summary())
            }
        }
    }

    /// Resolve coordinates to a place; falls back to the default place
    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> GeocodeResponse {
        let params = [("latlng", format!("{},{}", lat, lon))];
        let result = self
            .geocode(REVERSE_GEOCODE_PATH, &params, self.settings.request_timeout)
            .await;

        match result {
            Ok(response) => response,
            Err(e) => {
                warn!(lat, lon, error = %e, "Reverse geocode failed, answering with default place");
                fallback::geocode_response(&self.settings.default_place, &e.summary())
            }
        }
    }

    async fn geocode(
        &self,
        path: &str,
        params: &[(&str, String)],
        timeout: Duration,
    ) -> Result<GeocodeResponse> {
        let mut response: GeocodeResponse = self.vendor.get_json(path, params, timeout).await?;

        if !response.is_success() {
            return Err(Error::MalformedPayload(format!("geocode status {}", response.status)));
        }
        if response.results.is_empty() {
            return Err(Error::MalformedPayload("geocode returned no results".to_string()));
        }

        response.status = status::OK.to_string();
        response.error_details = None;
        Ok(response)
    }

    /// Fetch place details; there is no safe substitute, so errors propagate
    pub async fn place_details(&self, place_id: &str) -> Result<serde_json::Value> {
        let params = [("place_id", place_id.to_string())];
        self.vendor
            .get_json(DETAILS_PATH, &params, self.settings.autocomplete_timeout)
            .await
    }

    /// Fetch enhanced place details
    ///
    /// Callers fall back to [`Gateway::place_details`] on error.
    pub async fn place_details_advanced(&self, place_id: &str) -> Result<serde_json::Value> {
        let params = [("place_id", place_id.to_string())];
        self.vendor
            .get_json(DETAILS_ADVANCED_PATH, &params, self.settings.autocomplete_timeout)
            .await
    }

    /// Search around a point; errors propagate
    pub async fn nearby_search(&self, query: &NearbyQuery) -> Result<serde_json::Value> {
        let mut params = vec![
            ("location", format!("{},{}", query.lat, query.lng)),
            ("radius", query.radius.to_string()),
        ];
        if let Some(kind) = &query.kind {
            params.push(("types", kind.clone()));
        }

        self.vendor
            .get_json(NEARBY_PATH, &params, self.settings.autocomplete_timeout)
            .await
    }

    /// Fetch a place photo
    pub async fn photo(&self, query: &PhotoQuery) -> Result<VendorBytes> {
        let mut params = vec![
            ("photo_reference", query.reference.clone()),
            ("maxwidth", query.max_width.to_string()),
        ];
        if let Some(height) = query.max_height {
            params.push(("maxheight", height.to_string()));
        }

        self.vendor
            .get_bytes(PHOTO_PATH, &params, self.settings.request_timeout)
            .await
    }
}
